//! # CatVault Crypto
//!
//! Authenticated encryption for CatVault catalog records.
//!
//! This crate provides the cipher primitive the rest of CatVault builds on:
//! encrypt-and-sign / decrypt-and-verify over opaque UTF-8 payloads, using
//! AES-256-CBC with PKCS7 padding plus an HMAC-SHA256 signature.
//!
//! ## Wire format
//!
//! A sealed value is two base64 strings:
//!
//! - `payload` = base64(IV (16 bytes) || ciphertext)
//! - `signature` = base64(HMAC-SHA256 over the base64 `payload` string)
//!
//! The HMAC is computed over the *encoded* payload, not the raw ciphertext
//! bytes. This matches the key-provisioning side of the wire contract and
//! must not be changed.
//!
//! ## Usage
//!
//! ```
//! use catvault_crypto::{CatalogCipher, KeySet};
//!
//! let cipher = CatalogCipher::new(KeySet::generate());
//! let sealed = cipher.encrypt_and_sign("reference data").unwrap();
//! let plain = cipher.decrypt_and_verify(&sealed).unwrap();
//! assert_eq!(plain, "reference data");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cipher;
mod config;
mod error;
mod keys;

pub use cipher::{CatalogCipher, SealedBlob, IV_SIZE};
pub use config::{KeySet, CIPHER_KEY_ENV, MAC_KEY_ENV};
pub use error::{CryptoError, CryptoResult};
pub use keys::{CipherKey, MacKey, CIPHER_KEY_SIZE};
