//! Golden test vectors for cross-implementation verification.
//!
//! Every implementation that signs or verifies the same audit trail must
//! produce identical:
//! - canonical signing bytes
//! - signature (HMAC-SHA-256, lowercase hex)

use chrono::{DateTime, TimeZone, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;

use event_signer_core::{event_signing_bytes, EventSigner, IngestionNonce, Signature};

/// A golden test vector for audit event signing.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    pub secret: &'static [u8],
    pub event_id: &'static str,
    /// Timestamp as Unix seconds plus nanoseconds.
    pub unix_secs: i64,
    pub nanos: u32,
    pub source_ip: &'static str,
    pub payload: &'static [u8],
    /// Expected canonical bytes, as text.
    pub expected_canonical: &'static str,
    /// Expected signature (hex).
    pub expected_signature: &'static str,
}

impl GoldenVector {
    pub fn timestamp(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.unix_secs, self.nanos)
            .single()
            .expect("golden vector timestamps are in range")
    }
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "reference event",
            secret: b"test-secret",
            event_id: "event-123",
            unix_secs: 1_704_110_400, // 2024-01-01T12:00:00Z
            nanos: 0,
            source_ip: "192.168.1.100",
            payload: br#"{"test":"data"}"#,
            expected_canonical: r#"event-123|2024-01-01T12:00:00.000000000Z|192.168.1.100|{"test":"data"}"#,
            expected_signature: "03a186a79231bffe979c39e64e2acb6e0bbc83396d86cf0aa9b7c2a6aef68e45",
        },
        GoldenVector {
            name: "different event id",
            secret: b"test-secret",
            event_id: "different-event",
            unix_secs: 1_704_110_400,
            nanos: 0,
            source_ip: "192.168.1.100",
            payload: br#"{"test":"data"}"#,
            expected_canonical: r#"different-event|2024-01-01T12:00:00.000000000Z|192.168.1.100|{"test":"data"}"#,
            expected_signature: "0d3ca68bf380c6f098660efbfed6e3155a5b6dea4e8932519faaafa3cde74d35",
        },
        GoldenVector {
            name: "tampered payload",
            secret: b"test-secret",
            event_id: "event-123",
            unix_secs: 1_704_110_400,
            nanos: 0,
            source_ip: "192.168.1.100",
            payload: br#"{"tampered":"data"}"#,
            expected_canonical: r#"event-123|2024-01-01T12:00:00.000000000Z|192.168.1.100|{"tampered":"data"}"#,
            expected_signature: "4a636c9340968effa7d14ff87b42b4e879246ac7c8b8dadca25d9e44b4123bd8",
        },
        GoldenVector {
            name: "secret-1",
            secret: b"secret-1",
            event_id: "event-123",
            unix_secs: 1_704_110_400,
            nanos: 0,
            source_ip: "192.168.1.100",
            payload: br#"{"test":"data"}"#,
            expected_canonical: r#"event-123|2024-01-01T12:00:00.000000000Z|192.168.1.100|{"test":"data"}"#,
            expected_signature: "4cd7bf70a7ee1bded4748b186914fa103c094c64e90cbcbec8b11dff39c3d28f",
        },
        GoldenVector {
            name: "secret-2",
            secret: b"secret-2",
            event_id: "event-123",
            unix_secs: 1_704_110_400,
            nanos: 0,
            source_ip: "192.168.1.100",
            payload: br#"{"test":"data"}"#,
            expected_canonical: r#"event-123|2024-01-01T12:00:00.000000000Z|192.168.1.100|{"test":"data"}"#,
            expected_signature: "54535108de4da877dab62c2801c828e0c450a718972049c0bf823908846af318",
        },
        GoldenVector {
            name: "all empty at epoch",
            secret: b"",
            event_id: "",
            unix_secs: 0,
            nanos: 0,
            source_ip: "",
            payload: b"",
            expected_canonical: "|1970-01-01T00:00:00.000000000Z||",
            expected_signature: "7afa253fa350e143b8bec7605fcdf0a279f69bee5bada90b3227a9b021b704ac",
        },
        GoldenVector {
            name: "nanosecond timestamp",
            secret: b"test-secret",
            event_id: "event-123",
            unix_secs: 1_704_110_400,
            nanos: 123_456_789,
            source_ip: "192.168.1.100",
            payload: br#"{"test":"data"}"#,
            expected_canonical: r#"event-123|2024-01-01T12:00:00.123456789Z|192.168.1.100|{"test":"data"}"#,
            expected_signature: "ed06053e8563982efad6713c410c962fbf4de8f28c3f8b226f698e422c07dfac",
        },
        GoldenVector {
            name: "ipv6 source, empty payload",
            secret: b"test-secret",
            event_id: "evt-v6",
            unix_secs: 1_719_791_999, // 2024-06-30T23:59:59Z
            nanos: 999_999_999,
            source_ip: "2001:db8::1",
            payload: b"",
            expected_canonical: "evt-v6|2024-06-30T23:59:59.999999999Z|2001:db8::1|",
            expected_signature: "dab0973981cec52b8e450c2d35de02ad66a0a37773808618c67f01cc3ce7ffee",
        },
    ]
}

/// A golden vector for ingestion receipts with a pinned nonce.
#[derive(Debug, Clone)]
pub struct IngestionVector {
    pub secret: &'static [u8],
    pub hec_token_id: &'static str,
    pub source_ip: &'static str,
    pub event_count: u64,
    pub bytes_received: i64,
    pub unix_secs: i64,
    pub nonce: [u8; 16],
    pub expected_signature: &'static str,
}

/// The ingestion receipt vector.
pub fn ingestion_vector() -> IngestionVector {
    IngestionVector {
        secret: b"test-secret",
        hec_token_id: "hec-token-1",
        source_ip: "10.1.2.3",
        event_count: 100,
        bytes_received: 65_536,
        unix_secs: 1_704_110_400,
        nonce: [0u8; 16],
        expected_signature: "71f4d291d760c73bc1bf00f51c883889e159237133abb62d1b4fb676cf027128",
    }
}

impl IngestionVector {
    /// Sign the vector's fields with its pinned nonce.
    pub fn sign(&self) -> Signature {
        let timestamp = Utc
            .timestamp_opt(self.unix_secs, 0)
            .single()
            .expect("golden vector timestamps are in range");
        EventSigner::new(self.secret).sign_ingestion_with_nonce(
            self.hec_token_id,
            self.source_ip,
            self.event_count,
            self.bytes_received,
            &timestamp,
            &IngestionNonce::from_bytes(self.nonce),
        )
    }
}

/// Sign a vector's fields with its secret.
pub fn signature_for_vector(vector: &GoldenVector) -> Signature {
    EventSigner::new(vector.secret).sign(
        vector.event_id,
        &vector.timestamp(),
        vector.source_ip,
        vector.payload,
    )
}

/// HMAC-SHA-256 computed directly, bypassing the signer.
pub fn reference_hmac(key: &[u8], message: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Check every vector's canonical bytes and signature.
///
/// Returns `(name, matches, actual_signature_hex)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let canonical = event_signing_bytes(v.event_id, &v.timestamp(), v.source_ip, v.payload);
            let hex = signature_for_vector(v).to_hex();
            let matches =
                canonical == v.expected_canonical.as_bytes() && hex == v.expected_signature;
            (v.name.to_string(), matches, hex)
        })
        .collect()
}

/// Serializable form of a vector for sharing with other implementations.
#[derive(Debug, Serialize)]
pub struct ExportedVector {
    pub name: String,
    pub secret_hex: String,
    pub event_id: String,
    pub timestamp: String,
    pub source_ip: String,
    pub payload_hex: String,
    pub canonical_hex: String,
    pub signature: String,
}

/// Export all vectors as pretty JSON.
pub fn export_json() -> serde_json::Result<String> {
    let exported: Vec<ExportedVector> = all_vectors()
        .iter()
        .map(|v| {
            let ts = v.timestamp();
            ExportedVector {
                name: v.name.to_string(),
                secret_hex: hex::encode(v.secret),
                event_id: v.event_id.to_string(),
                timestamp: event_signer_core::format_timestamp(&ts),
                source_ip: v.source_ip.to_string(),
                payload_hex: hex::encode(v.payload),
                canonical_hex: hex::encode(event_signing_bytes(
                    v.event_id,
                    &ts,
                    v.source_ip,
                    v.payload,
                )),
                signature: signature_for_vector(v).to_hex(),
            }
        })
        .collect();
    serde_json::to_string_pretty(&exported)
}
