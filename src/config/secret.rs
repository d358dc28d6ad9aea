//! Secret handling for configuration values
//!
//! The hash key is the only secret Veil holds. It is wrapped with the
//! `secrecy` crate so it is zeroized on drop, redacted from `Debug` output,
//! and only readable through `expose_secret()`.
//!
//! # Example
//!
//! ```rust
//! use veil::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let key = secret_string("pepper".to_string());
//! assert_eq!(key.expose_secret(), "pepper");
//! assert!(!format!("{key:?}").contains("pepper"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String newtype usable inside [`Secret`]
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Check if the secret value is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes of the secret
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Secret string: zeroized on drop, redacted in `Debug`
pub type SecretString = Secret<SecretValue>;

/// Wrap a `String` as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Wrap an optional `String` as an optional [`SecretString`]
#[inline]
pub fn secret_string_opt(value: Option<String>) -> Option<SecretString> {
    value.map(secret_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_secret_string_creation() {
        let secret = secret_string("hash-key".to_string());
        assert_eq!(secret.expose_secret(), "hash-key");
        assert_eq!(secret.expose_secret().as_bytes(), b"hash-key");
    }

    #[test]
    fn test_secret_string_opt() {
        assert!(secret_string_opt(Some("k".to_string())).is_some());
        assert!(secret_string_opt(None).is_none());
    }

    #[test]
    fn test_secret_debug_redacted() {
        let secret = secret_string("sensitive-data".to_string());
        let debug_output = format!("{secret:?}");

        assert!(!debug_output.contains("sensitive-data"));
        assert!(debug_output.contains("REDACTED") || debug_output.contains("Secret"));
    }

    #[test]
    fn test_secret_serde() {
        #[derive(Serialize, Deserialize)]
        struct KeyHolder {
            hash_key: SecretString,
        }

        let holder: KeyHolder = toml::from_str("hash_key = \"pepper\"").unwrap();
        assert_eq!(holder.hash_key.expose_secret(), "pepper");

        let json = serde_json::to_string(&holder).unwrap();
        assert!(json.contains("pepper"));
    }
}
