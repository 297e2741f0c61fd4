//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use event_signer_core::{EventSigner, IngestionFields, IngestionNonce, Signature};

/// Generate a secret. Bytes are non-zero because HMAC zero-pads short keys.
pub fn secret() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(1u8..=255, 0..=64)
}

/// Generate a timestamp between 1970 and 2100 with any nanosecond.
pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        Utc.timestamp_opt(secs, nanos)
            .single()
            .expect("timestamp range is valid")
    })
}

/// Generate an event identifier.
pub fn event_id() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9-]{0,40}".prop_map(String::from)
}

/// Generate an IPv4 or IPv6 literal.
pub fn source_ip() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<[u8; 4]>().prop_map(|o| format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3])),
        any::<[u16; 8]>().prop_map(|s| s
            .iter()
            .map(|h| format!("{h:x}"))
            .collect::<Vec<_>>()
            .join(":")),
    ]
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a nonce.
pub fn nonce() -> impl Strategy<Value = IngestionNonce> {
    any::<[u8; 16]>().prop_map(IngestionNonce::from_bytes)
}

/// Generate ingestion batch fields.
pub fn ingestion_fields() -> impl Strategy<Value = IngestionFields> {
    (
        "[a-z0-9-]{1,36}",
        source_ip(),
        any::<u64>(),
        any::<i64>(),
        timestamp(),
    )
        .prop_map(
            |(hec_token_id, source_ip, event_count, bytes_received, timestamp)| IngestionFields {
                hec_token_id,
                source_ip,
                event_count,
                bytes_received,
                timestamp,
            },
        )
}

/// Parameters for signing one audit event.
#[derive(Debug, Clone)]
pub struct EventParams {
    pub secret: Vec<u8>,
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
    pub payload: Vec<u8>,
}

impl EventParams {
    /// A signer keyed with these parameters' secret.
    pub fn signer(&self) -> EventSigner {
        EventSigner::new(&self.secret)
    }

    /// Sign these parameters' fields with `signer`.
    pub fn sign_with(&self, signer: &EventSigner) -> Signature {
        signer.sign(&self.event_id, &self.timestamp, &self.source_ip, &self.payload)
    }
}

impl Arbitrary for EventParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (secret(), event_id(), timestamp(), source_ip(), payload(1000))
            .prop_map(|(secret, event_id, timestamp, source_ip, payload)| EventParams {
                secret,
                event_id,
                timestamp,
                source_ip,
                payload,
            })
            .boxed()
    }
}
