//! Ingestion receipts: the signed acknowledgment of an accepted batch.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::SignatureError;
use crate::signature::{decode_lower_hex, Signature};
use crate::signer::EventSigner;

/// Length of an ingestion nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// Random value mixed into every ingestion receipt signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IngestionNonce(pub [u8; NONCE_LEN]);

impl IngestionNonce {
    /// Draw a fresh nonce from the thread-local CSPRNG.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Convert to lowercase hex (32 chars).
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from lowercase hex.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        decode_lower_hex(s).map(Self)
    }
}

impl fmt::Debug for IngestionNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IngestionNonce({})", self.to_hex())
    }
}

impl Serialize for IngestionNonce {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for IngestionNonce {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// What the ingestion receiver knows about an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionFields {
    /// Identifier of the token the batch was submitted with.
    pub hec_token_id: String,
    /// Address the batch came from.
    pub source_ip: String,
    /// Number of events in the batch.
    pub event_count: u64,
    /// Size of the request body.
    pub bytes_received: i64,
    /// When the batch was accepted.
    pub timestamp: DateTime<Utc>,
}

/// A verifiable receipt: the batch fields, the nonce and the signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionReceipt {
    #[serde(flatten)]
    pub fields: IngestionFields,
    pub nonce: IngestionNonce,
    pub signature: Signature,
}

impl IngestionReceipt {
    /// Check this receipt against a signer.
    pub fn verify(&self, signer: &EventSigner) -> bool {
        signer.verify_ingestion(&self.fields, &self.nonce, &self.signature.to_hex())
    }
}
