//! Error types for the event signer.

use event_signer_core::{SignatureError, VerifyError};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the event signer's outer layers.
///
/// Signing and verification themselves never fail; these come from loading
/// the secret and from parsing or checking stored values.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading the signing secret failed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A stored signature or nonce could not be parsed.
    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),

    /// A stored record did not verify.
    #[error("verification failed: {0}")]
    Verify(#[from] VerifyError),
}

/// Result type for event signer operations.
pub type Result<T> = std::result::Result<T, Error>;
