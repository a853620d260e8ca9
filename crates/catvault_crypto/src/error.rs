//! Error types for cryptographic operations.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur while sealing or opening catalog payloads.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The HMAC signature did not match the payload.
    ///
    /// The data is corrupted or tampered with. Decryption is never
    /// attempted after this error.
    #[error("signature invalid: data corrupted or tampered")]
    Integrity,

    /// The payload framing is malformed (bad base64 or missing IV prefix).
    #[error("malformed payload: {message}")]
    Decode {
        /// Description of the framing problem.
        message: String,
    },

    /// Decryption produced no usable plaintext (wrong key or corrupted
    /// ciphertext).
    #[error("decryption failed: {message}")]
    Decryption {
        /// Description of the failure.
        message: String,
    },

    /// A key had the wrong length.
    #[error("invalid key size: expected {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Expected size in bytes.
        expected: usize,
        /// Actual size in bytes.
        actual: usize,
    },

    /// Key configuration could not be loaded.
    #[error("key configuration error: {message}")]
    KeyConfig {
        /// Description of the configuration problem.
        message: String,
    },
}

impl CryptoError {
    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Creates a decryption error.
    pub fn decryption(message: impl Into<String>) -> Self {
        Self::Decryption {
            message: message.into(),
        }
    }

    /// Creates an invalid key size error.
    pub fn invalid_key_size(actual: usize, expected: usize) -> Self {
        Self::InvalidKeySize { expected, actual }
    }

    /// Creates a key configuration error.
    pub fn key_config(message: impl Into<String>) -> Self {
        Self::KeyConfig {
            message: message.into(),
        }
    }
}
