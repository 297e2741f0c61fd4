//! Audit records: an event's signed fields stored next to their signature.
//!
//! A record keeps exactly the fields that go into the canonical signing
//! bytes, unmodified. Anything lossy here (trimming, re-encoding the payload,
//! truncating the timestamp) makes the record unverifiable.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VerifyError;
use crate::signature::Signature;
use crate::signer::EventSigner;

/// A signed audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub event_id: String,

    /// Full nanosecond precision is part of what is signed.
    pub timestamp: DateTime<Utc>,

    pub source_ip: String,

    /// Raw payload bytes as signed.
    pub payload: Bytes,

    pub signature: Signature,
}

impl AuditRecord {
    /// Sign the fields and bundle them with the signature.
    pub fn seal(
        signer: &EventSigner,
        event_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        source_ip: impl Into<String>,
        payload: impl Into<Bytes>,
    ) -> Self {
        let event_id = event_id.into();
        let source_ip = source_ip.into();
        let payload = payload.into();
        let signature = signer.sign(&event_id, &timestamp, &source_ip, &payload);

        Self {
            event_id,
            timestamp,
            source_ip,
            payload,
            signature,
        }
    }

    /// Whether the stored signature matches the stored fields.
    pub fn verify(&self, signer: &EventSigner) -> bool {
        signer.verify_signature(
            &self.event_id,
            &self.timestamp,
            &self.source_ip,
            &self.payload,
            &self.signature,
        )
    }

    /// Like [`AuditRecord::verify`], but with a typed rejection.
    pub fn verify_strict(&self, signer: &EventSigner) -> Result<(), VerifyError> {
        if self.verify(signer) {
            Ok(())
        } else {
            Err(VerifyError::SignatureMismatch)
        }
    }
}
