//! The event signer: HMAC-SHA-256 over canonical signing bytes.
//!
//! One signer is built at startup from the configured secret and shared by
//! reference with the audit writer, the ingestion receiver and verifiers.
//! Every operation is a pure computation over its arguments and the secret.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;

use crate::canonical::{event_signing_bytes, ingestion_signing_bytes};
use crate::ingestion::{IngestionFields, IngestionNonce, IngestionReceipt};
use crate::signature::Signature;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies audit events and ingestion receipts with a shared secret.
///
/// The secret is absorbed into a keyed HMAC state at construction and never
/// changes afterwards, so a signer can be shared across threads freely.
#[derive(Clone)]
pub struct EventSigner {
    /// HMAC state already keyed with the secret; cloned per call.
    keyed: HmacSha256,
    secret_len: usize,
}

impl EventSigner {
    /// Create a signer from a secret.
    ///
    /// Any byte sequence is accepted, including an empty one. Strength and
    /// length are the configuration layer's concern.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let secret = secret.as_ref();
        if secret.is_empty() {
            tracing::warn!("event signer created with an empty secret");
        } else {
            tracing::debug!(secret_len = secret.len(), "event signer created");
        }

        Self {
            keyed: keyed_mac(secret),
            secret_len: secret.len(),
        }
    }

    /// Length of the secret in bytes.
    pub fn secret_len(&self) -> usize {
        self.secret_len
    }

    /// Sign an audit event.
    ///
    /// Deterministic: equal inputs under the same secret always yield the
    /// same signature.
    pub fn sign(
        &self,
        event_id: &str,
        timestamp: &DateTime<Utc>,
        source_ip: &str,
        payload: &[u8],
    ) -> Signature {
        self.mac(&event_signing_bytes(event_id, timestamp, source_ip, payload))
    }

    /// Sign an audit event and return the 64-char hex wire form.
    pub fn sign_hex(
        &self,
        event_id: &str,
        timestamp: &DateTime<Utc>,
        source_ip: &str,
        payload: &[u8],
    ) -> String {
        self.sign(event_id, timestamp, source_ip, payload).to_hex()
    }

    /// Check a stored hex signature against the event fields.
    ///
    /// Fail-closed: anything that is not an exact match, including an empty,
    /// short, long or non-hex string, yields `false`.
    pub fn verify(
        &self,
        event_id: &str,
        timestamp: &DateTime<Utc>,
        source_ip: &str,
        payload: &[u8],
        signature: &str,
    ) -> bool {
        match Signature::from_hex(signature) {
            Ok(candidate) => {
                self.verify_signature(event_id, timestamp, source_ip, payload, &candidate)
            }
            Err(e) => {
                tracing::debug!(event_id, error = %e, "rejecting malformed event signature");
                false
            }
        }
    }

    /// Check an already-parsed signature against the event fields.
    pub fn verify_signature(
        &self,
        event_id: &str,
        timestamp: &DateTime<Utc>,
        source_ip: &str,
        payload: &[u8],
        signature: &Signature,
    ) -> bool {
        let expected = self.sign(event_id, timestamp, source_ip, payload);
        let ok = expected.ct_eq(signature);
        if !ok {
            tracing::debug!(event_id, "event signature mismatch");
        }
        ok
    }

    /// Sign an accepted ingestion batch.
    ///
    /// A fresh random nonce is mixed in on every call and then discarded, so
    /// identical arguments give different signatures and the result cannot
    /// be re-derived later. Use [`EventSigner::issue_receipt`] when the
    /// receipt must be verifiable.
    pub fn sign_ingestion(
        &self,
        hec_token_id: &str,
        source_ip: &str,
        event_count: u64,
        bytes_received: i64,
        timestamp: &DateTime<Utc>,
    ) -> Signature {
        let nonce = IngestionNonce::generate();
        self.sign_ingestion_with_nonce(
            hec_token_id,
            source_ip,
            event_count,
            bytes_received,
            timestamp,
            &nonce,
        )
    }

    /// Sign an ingestion batch with a caller-held nonce. Deterministic.
    pub fn sign_ingestion_with_nonce(
        &self,
        hec_token_id: &str,
        source_ip: &str,
        event_count: u64,
        bytes_received: i64,
        timestamp: &DateTime<Utc>,
        nonce: &IngestionNonce,
    ) -> Signature {
        self.mac(&ingestion_signing_bytes(
            hec_token_id,
            source_ip,
            event_count,
            bytes_received,
            timestamp,
            nonce,
        ))
    }

    /// Sign an ingestion batch and keep the nonce alongside the signature.
    pub fn issue_receipt(&self, fields: IngestionFields) -> IngestionReceipt {
        let nonce = IngestionNonce::generate();
        let signature = self.sign_ingestion_with_nonce(
            &fields.hec_token_id,
            &fields.source_ip,
            fields.event_count,
            fields.bytes_received,
            &fields.timestamp,
            &nonce,
        );

        tracing::debug!(
            hec_token_id = %fields.hec_token_id,
            event_count = fields.event_count,
            bytes_received = fields.bytes_received,
            "issued ingestion receipt"
        );

        IngestionReceipt {
            fields,
            nonce,
            signature,
        }
    }

    /// Check an ingestion receipt signature given the nonce it was made with.
    ///
    /// Fail-closed in the same way as [`EventSigner::verify`].
    pub fn verify_ingestion(
        &self,
        fields: &IngestionFields,
        nonce: &IngestionNonce,
        signature: &str,
    ) -> bool {
        let candidate = match Signature::from_hex(signature) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::debug!(
                    hec_token_id = %fields.hec_token_id,
                    error = %e,
                    "rejecting malformed ingestion signature"
                );
                return false;
            }
        };

        let expected = self.sign_ingestion_with_nonce(
            &fields.hec_token_id,
            &fields.source_ip,
            fields.event_count,
            fields.bytes_received,
            &fields.timestamp,
            nonce,
        );
        let ok = expected.ct_eq(&candidate);
        if !ok {
            tracing::debug!(hec_token_id = %fields.hec_token_id, "ingestion signature mismatch");
        }
        ok
    }

    fn mac(&self, message: &[u8]) -> Signature {
        let mut mac = self.keyed.clone();
        mac.update(message);
        Signature(mac.finalize().into_bytes().into())
    }
}

impl fmt::Debug for EventSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventSigner(secret_len={})", self.secret_len)
    }
}

fn keyed_mac(secret: &[u8]) -> HmacSha256 {
    // HMAC hashes or pads keys of any length, so this cannot fail.
    HmacSha256::new_from_slice(secret).expect("HMAC accepts keys of any length")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scenario_ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    fn is_wire_hex(s: &str) -> bool {
        s.len() == 64 && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = EventSigner::new("test-secret");
        let ts = scenario_ts();
        let s1 = signer.sign("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#);
        let s2 = signer.sign("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#);
        assert_eq!(s1, s2);
        assert!(is_wire_hex(&s1.to_hex()));
    }

    #[test]
    fn test_different_event_id_differs() {
        let signer = EventSigner::new("test-secret");
        let ts = scenario_ts();
        let s1 = signer.sign("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#);
        let s2 = signer.sign("different-event", &ts, "192.168.1.100", br#"{"test":"data"}"#);
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_verify_detects_tampered_payload() {
        let signer = EventSigner::new("test-secret");
        let ts = scenario_ts();
        let sig = signer.sign_hex("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#);

        assert!(signer.verify("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#, &sig));
        assert!(!signer.verify("event-123", &ts, "192.168.1.100", br#"{"tampered":"data"}"#, &sig));
    }

    #[test]
    fn test_sub_second_change_differs() {
        let signer = EventSigner::new("test-secret");
        let t1 = Utc.timestamp_opt(1_704_110_400, 0).unwrap();
        let t2 = Utc.timestamp_opt(1_704_110_400, 1).unwrap();
        let sig = signer.sign_hex("e", &t1, "ip", b"p");
        assert_ne!(sig, signer.sign_hex("e", &t2, "ip", b"p"));
        assert!(!signer.verify("e", &t2, "ip", b"p", &sig));
    }

    #[test]
    fn test_signers_do_not_cross_verify() {
        let a = EventSigner::new("secret-1");
        let b = EventSigner::new("secret-2");
        let ts = scenario_ts();
        let sa = a.sign_hex("event-123", &ts, "192.168.1.100", b"x");
        let sb = b.sign_hex("event-123", &ts, "192.168.1.100", b"x");

        assert_ne!(sa, sb);
        assert!(a.verify("event-123", &ts, "192.168.1.100", b"x", &sa));
        assert!(!a.verify("event-123", &ts, "192.168.1.100", b"x", &sb));
        assert!(b.verify("event-123", &ts, "192.168.1.100", b"x", &sb));
        assert!(!b.verify("event-123", &ts, "192.168.1.100", b"x", &sa));
    }

    #[test]
    fn test_empty_everything() {
        let signer = EventSigner::new(b"");
        let ts = scenario_ts();
        let sig = signer.sign_hex("", &ts, "", &[]);
        assert!(is_wire_hex(&sig));
        assert!(signer.verify("", &ts, "", &[], &sig));
    }

    #[test]
    fn test_verify_malformed_signatures() {
        let signer = EventSigner::new("test-secret");
        let ts = scenario_ts();
        let good = signer.sign_hex("e", &ts, "ip", b"p");

        for bad in [
            String::new(),
            good[..63].to_string(),
            format!("{}0", good),
            format!("{}z", &good[..63]),
            good.to_uppercase(),
            "é".repeat(32),
        ] {
            assert!(!signer.verify("e", &ts, "ip", b"p", &bad), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_sign_ingestion_is_not_deterministic() {
        let signer = EventSigner::new("test-secret");
        let ts = scenario_ts();
        let s1 = signer.sign_ingestion("hec-1", "10.0.0.1", 10, 2048, &ts);
        let s2 = signer.sign_ingestion("hec-1", "10.0.0.1", 10, 2048, &ts);
        assert_ne!(s1, s2);
        assert!(is_wire_hex(&s1.to_hex()));
        assert!(is_wire_hex(&s2.to_hex()));
    }

    #[test]
    fn test_sign_ingestion_with_nonce_is_deterministic() {
        let signer = EventSigner::new("test-secret");
        let ts = scenario_ts();
        let nonce = IngestionNonce::from_bytes([7; 16]);
        let s1 = signer.sign_ingestion_with_nonce("hec-1", "10.0.0.1", 10, 2048, &ts, &nonce);
        let s2 = signer.sign_ingestion_with_nonce("hec-1", "10.0.0.1", 10, 2048, &ts, &nonce);
        assert_eq!(s1, s2);
    }

    #[test]
    fn test_issue_and_verify_receipt() {
        let signer = EventSigner::new("test-secret");
        let fields = IngestionFields {
            hec_token_id: "hec-1".into(),
            source_ip: "10.0.0.1".into(),
            event_count: 10,
            bytes_received: 2048,
            timestamp: scenario_ts(),
        };
        let receipt = signer.issue_receipt(fields.clone());
        let sig = receipt.signature.to_hex();

        assert!(signer.verify_ingestion(&fields, &receipt.nonce, &sig));

        let mut tampered = fields.clone();
        tampered.event_count = 11;
        assert!(!signer.verify_ingestion(&tampered, &receipt.nonce, &sig));

        let other_nonce = IngestionNonce::from_bytes([0; 16]);
        assert!(!signer.verify_ingestion(&fields, &other_nonce, &sig));

        assert!(!signer.verify_ingestion(&fields, &receipt.nonce, "short"));
    }

    #[test]
    fn test_debug_hides_secret() {
        let signer = EventSigner::new("super-secret-value");
        let debug = format!("{:?}", signer);
        assert_eq!(debug, "EventSigner(secret_len=18)");
        assert!(!debug.contains("super"));
    }

    #[test]
    fn test_signer_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventSigner>();
    }
}
