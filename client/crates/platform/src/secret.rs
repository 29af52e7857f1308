//! Secret strings
//!
//! Holds key material (e.g. a WIF-encoded private key) read from the wallet
//! file.
//!
//! ## Security Features
//! - Zeroization on drop prevents the secret from lingering in freed memory
//! - Debug output is redacted so secrets never reach logs
//! - No `Clone`, so copies are always explicit

use std::fmt;

use serde::{Deserialize, Deserializer};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// Secret is empty or whitespace only
    #[error("Secret cannot be empty or contain only whitespace")]
    Empty,

    /// Secret contains whitespace or control characters inside it
    #[error("Secret contains invalid characters")]
    InvalidCharacter,
}

/// Secret string with automatic memory zeroization
///
/// ## Examples
/// ```rust
/// use platform::secret::SecretString;
///
/// let wif = SecretString::new("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn".to_string())?;
/// assert_eq!(format!("{:?}", wif), "SecretString([REDACTED])");
/// # Ok::<(), platform::secret::SecretError>(())
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret, trimming surrounding whitespace
    ///
    /// The raw input is zeroized before returning, including on error.
    pub fn new(mut raw: String) -> Result<Self, SecretError> {
        let trimmed = raw.trim();
        let result = if trimmed.is_empty() {
            Err(SecretError::Empty)
        } else if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            Err(SecretError::InvalidCharacter)
        } else {
            Ok(Self(trimmed.to_string()))
        };
        raw.zeroize();
        result
    }

    /// Borrow the secret value
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        SecretString::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_trims() {
        let secret = SecretString::new("  abc123 \n".to_string()).unwrap();
        assert_eq!(secret.expose(), "abc123");
    }

    #[test]
    fn test_secret_rejects_empty() {
        assert_eq!(
            SecretString::new("   ".to_string()).unwrap_err(),
            SecretError::Empty
        );
    }

    #[test]
    fn test_secret_rejects_inner_whitespace() {
        assert_eq!(
            SecretString::new("abc 123".to_string()).unwrap_err(),
            SecretError::InvalidCharacter
        );
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = SecretString::new("topsecret".to_string()).unwrap();
        let debug = format!("{:?}", secret);
        assert!(!debug.contains("topsecret"));
    }

    #[test]
    fn test_deserialize() {
        #[derive(Deserialize)]
        struct Wallet {
            key: SecretString,
        }
        let wallet: Wallet = serde_json::from_str(r#"{"key":"L1abc"}"#).unwrap();
        assert_eq!(wallet.key.expose(), "L1abc");

        let result = serde_json::from_str::<Wallet>(r#"{"key":""}"#);
        assert!(result.is_err());
    }
}
