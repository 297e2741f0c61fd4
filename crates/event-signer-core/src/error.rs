//! Error types for the Event Signer Core.
//!
//! Signing and verification never fail; these cover parsing at the edges
//! and typed rejections for callers that want more than a boolean.

use thiserror::Error;

/// Errors parsing a hex-encoded signature or nonce.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    #[error("invalid length: expected {expected} hex chars, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

/// Why a stored record failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("signature does not match record contents")]
    SignatureMismatch,
}
