//! Key material for the catalog cipher.

use crate::error::{CryptoError, CryptoResult};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the AES-256 cipher key in bytes.
pub const CIPHER_KEY_SIZE: usize = 32;

/// Symmetric encryption key for AES-256-CBC.
///
/// The key is automatically zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    bytes: [u8; CIPHER_KEY_SIZE],
}

impl CipherKey {
    /// Generates a new random cipher key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; CIPHER_KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is not exactly 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.len() != CIPHER_KEY_SIZE {
            return Err(CryptoError::invalid_key_size(bytes.len(), CIPHER_KEY_SIZE));
        }

        let mut key_bytes = [0u8; CIPHER_KEY_SIZE];
        key_bytes.copy_from_slice(bytes);
        Ok(Self { bytes: key_bytes })
    }

    /// Returns the key as a byte array.
    ///
    /// # Security
    ///
    /// Be careful with this method - don't log or serialize the result.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; CIPHER_KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Signing key for the HMAC-SHA256 payload signature.
///
/// Any non-empty byte string is accepted; the provisioning side decides
/// the length. Zeroized when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MacKey {
    bytes: Vec<u8>,
}

impl MacKey {
    /// Generates a new random 32-byte signing key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a signing key from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the slice is empty.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        if bytes.is_empty() {
            return Err(CryptoError::invalid_key_size(0, 1));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Returns the key as a byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MacKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
