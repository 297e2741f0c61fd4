//! # Event Signer
//!
//! Tamper-evident signatures for audit-trail entries and ingestion receipts.
//!
//! ## Overview
//!
//! Every persisted audit record and every accepted ingestion batch carries an
//! HMAC-SHA-256 signature. A verifier holding the same secret can later detect
//! whether the record, its timestamp or its origin changed after the fact.
//!
//! - **Sign**: deterministic signature over `event_id | timestamp | source_ip | payload`
//! - **Verify**: fail-closed, constant-time check of a stored signature
//! - **Sign ingestion**: nonce-bearing receipt signature for an accepted batch
//!
//! ## Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use event_signer::{EventSigner, SignerConfig};
//!
//! // Built once at startup and shared by reference.
//! let signer: EventSigner = SignerConfig::inline("test-secret").build().unwrap();
//!
//! let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
//! let sig = signer.sign_hex("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#);
//! assert_eq!(sig.len(), 64);
//! assert!(signer.verify("event-123", &ts, "192.168.1.100", br#"{"test":"data"}"#, &sig));
//! ```
//!
//! ## Ingestion receipts
//!
//! [`EventSigner::sign_ingestion`] mixes a random nonce into the signature and
//! discards it, so its output cannot be checked later. When the receipt has
//! to be verifiable, use [`EventSigner::issue_receipt`], which returns the
//! nonce with the signature, and [`EventSigner::verify_ingestion`].
//!
//! ## Re-exports
//!
//! - `event_signer::core` - Core primitives (EventSigner, Signature, etc.)

pub mod config;
pub mod error;

use chrono::{DateTime, Utc};

// Re-export component crate
pub use event_signer_core as core;


pub use config::{ConfigError, SecretEncoding, SecretSource, SignerConfig};
pub use error::{Error, Result};

// Re-export commonly used core types
pub use event_signer_core::{
    AuditRecord, EventSigner, IngestionFields, IngestionNonce, IngestionReceipt, Signature,
    SignatureError, VerifyError,
};

/// Parse a stored signature and check an audit record's fields against it.
///
/// Unlike [`EventSigner::verify`], this reports why a record was rejected.
pub fn verify_stored(
    signer: &EventSigner,
    event_id: &str,
    timestamp: &DateTime<Utc>,
    source_ip: &str,
    payload: &[u8],
    signature: &str,
) -> Result<()> {
    let signature = Signature::from_hex(signature)?;
    if signer.verify_signature(event_id, timestamp, source_ip, payload, &signature) {
        Ok(())
    } else {
        Err(VerifyError::SignatureMismatch.into())
    }
}
