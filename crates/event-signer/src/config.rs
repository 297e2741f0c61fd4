//! Loading the signing secret at process start.
//!
//! The secret comes from one of three places: inline bytes (tests, embedding),
//! an environment variable, or a file. Either can be raw bytes or hex. The
//! secret is read once; there is no reload.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use event_signer_core::EventSigner;
use thiserror::Error;

/// Environment variable holding the secret itself.
pub const SECRET_ENV: &str = "EVENT_SIGNER_SECRET";

/// Environment variable holding a path to a file containing the secret.
/// Takes precedence over [`SECRET_ENV`].
pub const SECRET_FILE_ENV: &str = "EVENT_SIGNER_SECRET_FILE";

/// Environment variable selecting the secret encoding (`raw` or `hex`).
pub const SECRET_ENCODING_ENV: &str = "EVENT_SIGNER_SECRET_ENCODING";

/// Errors that can occur while loading the secret.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    MissingEnv(String),

    #[error("failed to read secret file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("secret is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("unknown secret encoding {0:?} (expected \"raw\" or \"hex\")")]
    InvalidEncoding(String),

    #[error("signing secret is empty")]
    EmptySecret,
}

/// How secret bytes are spelled at the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretEncoding {
    /// Use the bytes as-is.
    #[default]
    Raw,
    /// Decode hex (surrounding whitespace ignored).
    Hex,
}

impl FromStr for SecretEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" | "" => Ok(Self::Raw),
            "hex" => Ok(Self::Hex),
            other => Err(ConfigError::InvalidEncoding(other.to_string())),
        }
    }
}

/// Where the secret is loaded from.
#[derive(Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Bytes supplied directly.
    Inline(Vec<u8>),
    /// An environment variable.
    Env { var: String, encoding: SecretEncoding },
    /// A file. One trailing newline is stripped.
    File { path: PathBuf, encoding: SecretEncoding },
}

impl fmt::Debug for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline(bytes) => write!(f, "Inline(<{} bytes>)", bytes.len()),
            Self::Env { var, encoding } => f
                .debug_struct("Env")
                .field("var", var)
                .field("encoding", encoding)
                .finish(),
            Self::File { path, encoding } => f
                .debug_struct("File")
                .field("path", path)
                .field("encoding", encoding)
                .finish(),
        }
    }
}

/// Configuration for building the process-wide [`EventSigner`].
#[derive(Debug, Clone)]
pub struct SignerConfig {
    /// Where to read the secret.
    pub secret: SecretSource,
    /// Refuse to build a signer from an empty secret.
    pub require_non_empty: bool,
}

impl Default for SignerConfig {
    fn default() -> Self {
        Self {
            secret: SecretSource::Env {
                var: SECRET_ENV.to_string(),
                encoding: SecretEncoding::Raw,
            },
            require_non_empty: true,
        }
    }
}

impl SignerConfig {
    /// Configuration with an inline secret.
    pub fn inline(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: SecretSource::Inline(secret.into()),
            ..Self::default()
        }
    }

    /// Configuration reading the secret from a file.
    pub fn file(path: impl AsRef<Path>, encoding: SecretEncoding) -> Self {
        Self {
            secret: SecretSource::File {
                path: path.as_ref().to_path_buf(),
                encoding,
            },
            ..Self::default()
        }
    }

    /// Resolve the secret source from the process environment.
    ///
    /// [`SECRET_FILE_ENV`] wins over [`SECRET_ENV`]; [`SECRET_ENCODING_ENV`]
    /// applies to whichever is used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Like [`SignerConfig::from_env`], with a custom variable lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let encoding = match lookup(SECRET_ENCODING_ENV) {
            Some(value) => value.parse()?,
            None => SecretEncoding::default(),
        };

        let secret = match lookup(SECRET_FILE_ENV) {
            Some(path) => SecretSource::File {
                path: PathBuf::from(path),
                encoding,
            },
            None => SecretSource::Env {
                var: SECRET_ENV.to_string(),
                encoding,
            },
        };

        Ok(Self {
            secret,
            ..Self::default()
        })
    }

    /// Read and decode the secret.
    pub fn load_secret(&self) -> Result<Vec<u8>, ConfigError> {
        self.load_secret_with(|name| std::env::var(name).ok())
    }

    /// Like [`SignerConfig::load_secret`], with a custom variable lookup.
    pub fn load_secret_with<F>(&self, lookup: F) -> Result<Vec<u8>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match &self.secret {
            SecretSource::Inline(bytes) => bytes.clone(),
            SecretSource::Env { var, encoding } => {
                let value = lookup(var.as_str()).ok_or_else(|| ConfigError::MissingEnv(var.clone()))?;
                decode(value.into_bytes(), *encoding)?
            }
            SecretSource::File { path, encoding } => {
                let raw = std::fs::read(path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                decode(strip_trailing_newline(raw), *encoding)?
            }
        };

        if secret.is_empty() {
            if self.require_non_empty {
                return Err(ConfigError::EmptySecret);
            }
            tracing::warn!(source = ?self.secret, "loaded an empty signing secret");
        } else {
            tracing::info!(source = ?self.secret, secret_len = secret.len(), "loaded signing secret");
        }

        Ok(secret)
    }

    /// Load the secret and build the signer.
    pub fn build(&self) -> Result<EventSigner, ConfigError> {
        Ok(EventSigner::new(self.load_secret()?))
    }

    /// Like [`SignerConfig::build`], with a custom variable lookup.
    pub fn build_with<F>(&self, lookup: F) -> Result<EventSigner, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(EventSigner::new(self.load_secret_with(lookup)?))
    }
}

fn decode(bytes: Vec<u8>, encoding: SecretEncoding) -> Result<Vec<u8>, ConfigError> {
    match encoding {
        SecretEncoding::Raw => Ok(bytes),
        SecretEncoding::Hex => Ok(hex::decode(String::from_utf8_lossy(&bytes).trim())?),
    }
}

fn strip_trailing_newline(mut bytes: Vec<u8>) -> Vec<u8> {
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_reads_secret_env() {
        let config = SignerConfig::default();
        let secret = config
            .load_secret_with(env(&[(SECRET_ENV, "from-env")]))
            .unwrap();
        assert_eq!(secret, b"from-env");
    }

    #[test]
    fn test_missing_env_is_an_error() {
        let err = SignerConfig::default()
            .load_secret_with(env(&[]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(var) if var == SECRET_ENV));
    }

    #[test]
    fn test_empty_secret_rejected_unless_allowed() {
        let config = SignerConfig::inline(Vec::new());
        assert!(matches!(config.load_secret(), Err(ConfigError::EmptySecret)));

        let config = SignerConfig {
            require_non_empty: false,
            ..SignerConfig::inline(Vec::new())
        };
        assert_eq!(config.load_secret().unwrap(), Vec::<u8>::new());
        assert_eq!(config.build().unwrap().secret_len(), 0);
    }

    #[test]
    fn test_hex_encoding_from_env() {
        let lookup = env(&[(SECRET_ENCODING_ENV, "hex"), (SECRET_ENV, " 00ff10 ")]);
        let config = SignerConfig::from_env_with(&lookup).unwrap();
        assert_eq!(config.load_secret_with(&lookup).unwrap(), vec![0x00, 0xff, 0x10]);
    }

    #[test]
    fn test_invalid_hex() {
        let lookup = env(&[(SECRET_ENCODING_ENV, "hex"), (SECRET_ENV, "xyz")]);
        let config = SignerConfig::from_env_with(&lookup).unwrap();
        assert!(matches!(
            config.load_secret_with(&lookup),
            Err(ConfigError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_unknown_encoding() {
        let err = SignerConfig::from_env_with(env(&[(SECRET_ENCODING_ENV, "base64")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEncoding(e) if e == "base64"));
    }

    #[test]
    fn test_file_env_takes_precedence() {
        let lookup = env(&[(SECRET_FILE_ENV, "/run/secrets/signer"), (SECRET_ENV, "x")]);
        let config = SignerConfig::from_env_with(lookup).unwrap();
        assert_eq!(
            config.secret,
            SecretSource::File {
                path: PathBuf::from("/run/secrets/signer"),
                encoding: SecretEncoding::Raw,
            }
        );
    }

    #[test]
    fn test_strip_trailing_newline() {
        assert_eq!(strip_trailing_newline(b"abc\n".to_vec()), b"abc");
        assert_eq!(strip_trailing_newline(b"abc\r\n".to_vec()), b"abc");
        assert_eq!(strip_trailing_newline(b"abc\n\n".to_vec()), b"abc\n");
        assert_eq!(strip_trailing_newline(b"abc ".to_vec()), b"abc ");
    }

    #[test]
    fn test_debug_redacts_inline_secret() {
        let source = SecretSource::Inline(b"hunter2".to_vec());
        assert_eq!(format!("{:?}", source), "Inline(<7 bytes>)");
    }

    #[test]
    fn test_inline_build_matches_direct_signer() {
        use chrono::{TimeZone, Utc};

        let built = SignerConfig::inline("test-secret").build().unwrap();
        let direct = EventSigner::new("test-secret");
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(
            built.sign("e", &ts, "ip", b"p"),
            direct.sign("e", &ts, "ip", b"p")
        );
    }
}
