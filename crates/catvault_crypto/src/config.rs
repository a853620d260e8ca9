//! Key configuration loading.
//!
//! The cipher itself takes keys as constructor parameters; this module is
//! the single boundary that reads them from the process environment.

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{CipherKey, MacKey};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Environment variable holding the base64-encoded AES-256 key.
pub const CIPHER_KEY_ENV: &str = "CATVAULT_CIPHER_KEY";

/// Environment variable holding the base64-encoded HMAC signing key.
pub const MAC_KEY_ENV: &str = "CATVAULT_MAC_KEY";

/// The pre-shared key pair the catalog cipher operates with.
#[derive(Clone, Debug)]
pub struct KeySet {
    /// AES-256 encryption key.
    pub cipher_key: CipherKey,
    /// HMAC-SHA256 signing key.
    pub mac_key: MacKey,
}

impl KeySet {
    /// Creates a key set from already-validated keys.
    #[must_use]
    pub fn new(cipher_key: CipherKey, mac_key: MacKey) -> Self {
        Self {
            cipher_key,
            mac_key,
        }
    }

    /// Generates a random key set.
    ///
    /// Useful for tests and ephemeral caches; production keys are
    /// provisioned externally.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            cipher_key: CipherKey::generate(),
            mac_key: MacKey::generate(),
        }
    }

    /// Creates a key set from base64-encoded key material.
    ///
    /// # Errors
    ///
    /// Returns an error if either value is not valid base64 or decodes to
    /// a key of the wrong size.
    pub fn from_base64(cipher_key: &str, mac_key: &str) -> CryptoResult<Self> {
        let cipher_bytes = BASE64
            .decode(cipher_key.trim())
            .map_err(|e| CryptoError::key_config(format!("cipher key is not base64: {e}")))?;
        let mac_bytes = BASE64
            .decode(mac_key.trim())
            .map_err(|e| CryptoError::key_config(format!("mac key is not base64: {e}")))?;

        Ok(Self {
            cipher_key: CipherKey::from_bytes(&cipher_bytes)?,
            mac_key: MacKey::from_bytes(&mac_bytes)?,
        })
    }

    /// Loads the key set from the process environment.
    ///
    /// Reads [`CIPHER_KEY_ENV`] and [`MAC_KEY_ENV`], both base64.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is missing or malformed.
    pub fn from_env() -> CryptoResult<Self> {
        let cipher_key = std::env::var(CIPHER_KEY_ENV)
            .map_err(|_| CryptoError::key_config(format!("{CIPHER_KEY_ENV} is not set")))?;
        let mac_key = std::env::var(MAC_KEY_ENV)
            .map_err(|_| CryptoError::key_config(format!("{MAC_KEY_ENV} is not set")))?;

        Self::from_base64(&cipher_key, &mac_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::CIPHER_KEY_SIZE;

    #[test]
    fn from_base64_roundtrip() {
        let cipher = BASE64.encode([1u8; CIPHER_KEY_SIZE]);
        let mac = BASE64.encode(b"signing-key");

        let keys = KeySet::from_base64(&cipher, &mac).unwrap();
        assert_eq!(keys.cipher_key.as_bytes(), &[1u8; CIPHER_KEY_SIZE]);
        assert_eq!(keys.mac_key.as_bytes(), b"signing-key");
    }

    #[test]
    fn from_base64_rejects_garbage() {
        let mac = BASE64.encode(b"signing-key");
        assert!(KeySet::from_base64("not base64!!!", &mac).is_err());
    }

    #[test]
    fn from_base64_rejects_short_cipher_key() {
        let cipher = BASE64.encode([1u8; 16]);
        let mac = BASE64.encode(b"signing-key");
        let err = KeySet::from_base64(&cipher, &mac).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidKeySize { .. }));
    }

    #[test]
    fn from_base64_tolerates_whitespace() {
        let cipher = format!("  {}\n", BASE64.encode([9u8; CIPHER_KEY_SIZE]));
        let mac = BASE64.encode(b"k");
        assert!(KeySet::from_base64(&cipher, &mac).is_ok());
    }
}
