//! Credentials held in memory
//!
//! The Google private key and static access token are wrapped in
//! [`SecretString`], which zeroes its buffer on drop and prints as redacted.
//!
//! ```rust
//! use kiosk_export::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("ya29.a0Af".to_string());
//! assert_eq!(token.expose_secret().as_str(), "ya29.a0Af");
//! assert!(!format!("{token:?}").contains("ya29"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Credential text; only reachable through [`secrecy::ExposeSecret`]
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[serde(transparent)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl SecretValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub type SecretString = Secret<SecretValue>;

/// Wrap a credential read from config or the environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}
