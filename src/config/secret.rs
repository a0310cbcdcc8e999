//! Secure credential handling using the secrecy crate
//!
//! Connection strings and object store keys are wrapped in [`SecretString`]
//! so they are zeroed on drop and redacted from `Debug` output.
//!
//! # Example
//!
//! ```rust
//! use claims_reporting::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let dsn = secret_string("postgres://user:pw@db/claims".to_string());
//! assert_eq!(dsn.expose_secret().as_ref(), "postgres://user:pw@db/claims");
//! assert!(!format!("{dsn:?}").contains("pw"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Newtype wrapper for String that implements the required traits for Secret
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

    /// Check if the secret value starts with a prefix
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
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

/// Secret string: zeroed on drop, redacted in Debug, read via `expose_secret()`
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Returns `postgres://***@host/db` with credentials removed
pub fn redact_connection_string(value: &SecretString) -> String {
    use secrecy::ExposeSecret;

    let raw = value.expose_secret().as_ref();
    match raw.rsplit_once('@') {
        Some((_, host)) => format!("postgresql://***@{host}"),
        None => raw.to_string(),
    }
}
