//! # Event Signer Core
//!
//! Pure primitives for tamper-evident audit records and ingestion receipts.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation: canonicalize a tuple of fields, key an HMAC-SHA-256 over it,
//! and hand back a 64-character lowercase hex signature.
//!
//! ## Key Types
//!
//! - [`EventSigner`] - Holds the shared secret; signs and verifies
//! - [`Signature`] - A 32-byte HMAC-SHA-256 digest (64 hex chars on the wire)
//! - [`IngestionReceipt`] - Fields, nonce and signature of an accepted batch
//! - [`AuditRecord`] - An audit event sealed with its signature
//!
//! ## Canonicalization
//!
//! Fields are joined with `|` in a fixed order, timestamps rendered with a
//! fixed nanosecond format. See [`canonical`] module.

pub mod canonical;
pub mod error;
pub mod ingestion;
pub mod record;
pub mod signature;
pub mod signer;

pub use canonical::{event_signing_bytes, format_timestamp, ingestion_signing_bytes};
pub use error::{SignatureError, VerifyError};
pub use ingestion::{IngestionFields, IngestionNonce, IngestionReceipt};
pub use record::AuditRecord;
pub use signature::Signature;
pub use signer::EventSigner;
