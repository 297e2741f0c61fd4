//! HMAC-SHA-256 signatures with a strict lowercase-hex wire form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::error::SignatureError;

/// Length of a signature digest in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// Length of a signature's hex encoding.
pub const SIGNATURE_HEX_LEN: usize = SIGNATURE_LEN * 2;

/// A 32-byte HMAC-SHA-256 digest.
///
/// On the wire and in storage this is always 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl Signature {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Convert to the 64-char lowercase hex wire form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from the wire form.
    ///
    /// Only lowercase hex of exactly 64 characters is accepted. Uppercase is
    /// rejected so that a stored signature has a single valid spelling.
    pub fn from_hex(s: &str) -> Result<Self, SignatureError> {
        decode_lower_hex(s).map(Self)
    }

    /// Compare in time independent of where the digests first differ.
    pub fn ct_eq(&self, other: &Signature) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; SIGNATURE_LEN]> for Signature {
    fn from(bytes: [u8; SIGNATURE_LEN]) -> Self {
        Self(bytes)
    }
}

impl std::str::FromStr for Signature {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Decode exactly `N` bytes from lowercase hex.
pub(crate) fn decode_lower_hex<const N: usize>(s: &str) -> Result<[u8; N], SignatureError> {
    if s.len() != N * 2 {
        return Err(SignatureError::InvalidLength {
            expected: N * 2,
            got: s.len(),
        });
    }

    if let Some((index, character)) = s
        .char_indices()
        .find(|(_, c)| !matches!(c, '0'..='9' | 'a'..='f'))
    {
        return Err(SignatureError::InvalidCharacter { character, index });
    }

    let mut out = [0u8; N];
    hex::decode_to_slice(s, &mut out).map_err(|_| SignatureError::InvalidLength {
        expected: N * 2,
        got: s.len(),
    })?;
    Ok(out)
}
