//! The catalog cipher: AES-256-CBC encryption with HMAC-SHA256 signing.

use crate::config::KeySet;
use crate::error::{CryptoError, CryptoResult};
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// Size of the CBC initialization vector in bytes.
///
/// The IV is always the first 16 bytes of the decoded payload. There is
/// exactly one framing; no alternate slicing exists.
pub const IV_SIZE: usize = 16;

/// An authenticated, encrypted payload as stored and transported.
///
/// Both fields are base64 strings. `signature` authenticates the encoded
/// `payload` string, so a blob can be verified without any base64 work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedBlob {
    /// base64(IV || ciphertext).
    pub payload: String,
    /// base64(HMAC-SHA256(payload)).
    pub signature: String,
}

/// Encrypts and signs catalog payloads.
///
/// Keys are injected at construction; the cipher never reads ambient
/// configuration. Verify-then-decrypt order is mandatory: unverified
/// ciphertext is never fed to the block cipher.
pub struct CatalogCipher {
    keys: KeySet,
}

impl CatalogCipher {
    /// Creates a cipher over the given key set.
    #[must_use]
    pub fn new(keys: KeySet) -> Self {
        Self { keys }
    }

    /// Encrypts a plaintext string and signs the encoded result.
    ///
    /// A fresh random IV is generated per call, so identical plaintexts
    /// produce different payloads.
    ///
    /// # Errors
    ///
    /// Returns an error if the HMAC key is rejected by the MAC
    /// implementation.
    pub fn encrypt_and_sign(&self, plaintext: &str) -> CryptoResult<SealedBlob> {
        let mut iv = [0u8; IV_SIZE];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = Aes256CbcEnc::new(self.keys.cipher_key.as_bytes().into(), (&iv).into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        let mut framed = Vec::with_capacity(IV_SIZE + ciphertext.len());
        framed.extend_from_slice(&iv);
        framed.extend(ciphertext);

        let payload = BASE64.encode(&framed);
        let signature = BASE64.encode(self.sign(&payload)?);

        Ok(SealedBlob { payload, signature })
    }

    /// Verifies a sealed blob's signature and decrypts its payload.
    ///
    /// # Errors
    ///
    /// - [`CryptoError::Integrity`] if the signature does not match the
    ///   payload. Decryption is not attempted.
    /// - [`CryptoError::Decode`] if the payload is not base64 or is shorter
    ///   than the IV prefix.
    /// - [`CryptoError::Decryption`] if padding is invalid (wrong key or
    ///   corrupted ciphertext) or the plaintext is not UTF-8.
    pub fn decrypt_and_verify(&self, blob: &SealedBlob) -> CryptoResult<String> {
        self.verify(&blob.payload, &blob.signature)?;

        let framed = BASE64
            .decode(&blob.payload)
            .map_err(|e| CryptoError::decode(format!("payload is not base64: {e}")))?;

        if framed.len() < IV_SIZE {
            return Err(CryptoError::decode(format!(
                "payload too short: {} bytes, need at least {IV_SIZE} for the IV",
                framed.len()
            )));
        }

        let (iv, ciphertext) = framed.split_at(IV_SIZE);
        let mut iv_bytes = [0u8; IV_SIZE];
        iv_bytes.copy_from_slice(iv);

        let plaintext = Aes256CbcDec::new(self.keys.cipher_key.as_bytes().into(), (&iv_bytes).into())
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::decryption("wrong key or corrupted ciphertext"))?;

        String::from_utf8(plaintext)
            .map_err(|_| CryptoError::decryption("plaintext is not valid UTF-8"))
    }

    /// Computes the HMAC-SHA256 tag over an encoded payload string.
    fn sign(&self, payload: &str) -> CryptoResult<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.keys.mac_key.as_bytes())
            .map_err(|_| CryptoError::key_config("mac key rejected by HMAC"))?;
        mac.update(payload.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }

    /// Verifies a signature against an encoded payload string.
    ///
    /// Comparison is constant-time. A signature that is not even valid
    /// base64 cannot match and is reported as an integrity failure.
    fn verify(&self, payload: &str, signature: &str) -> CryptoResult<()> {
        let expected = BASE64.decode(signature).map_err(|_| CryptoError::Integrity)?;

        let mut mac = HmacSha256::new_from_slice(self.keys.mac_key.as_bytes())
            .map_err(|_| CryptoError::key_config("mac key rejected by HMAC"))?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).map_err(|_| CryptoError::Integrity)
    }
}

impl std::fmt::Debug for CatalogCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogCipher")
            .field("cipher", &"Aes256Cbc+HmacSha256")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_cipher() -> CatalogCipher {
        CatalogCipher::new(KeySet::generate())
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = test_cipher();

        let sealed = cipher.encrypt_and_sign("Hello, CatVault!").unwrap();
        let plain = cipher.decrypt_and_verify(&sealed).unwrap();
        assert_eq!(plain, "Hello, CatVault!");
    }

    #[test]
    fn fresh_iv_produces_different_payloads() {
        let cipher = test_cipher();

        let s1 = cipher.encrypt_and_sign("same data").unwrap();
        let s2 = cipher.encrypt_and_sign("same data").unwrap();
        assert_ne!(s1.payload, s2.payload);
    }

    #[test]
    fn tampered_payload_is_integrity_error() {
        let cipher = test_cipher();
        let mut sealed = cipher.encrypt_and_sign("secret").unwrap();

        // Swap one character of the encoded payload.
        let mut chars: Vec<char> = sealed.payload.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        sealed.payload = chars.into_iter().collect();

        let err = cipher.decrypt_and_verify(&sealed).unwrap_err();
        assert!(matches!(err, CryptoError::Integrity));
    }

    #[test]
    fn tampered_signature_is_integrity_error() {
        let cipher = test_cipher();
        let mut sealed = cipher.encrypt_and_sign("secret").unwrap();

        let mut chars: Vec<char> = sealed.signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        sealed.signature = chars.into_iter().collect();

        let err = cipher.decrypt_and_verify(&sealed).unwrap_err();
        assert!(matches!(err, CryptoError::Integrity));
    }

    #[test]
    fn garbage_signature_is_integrity_error() {
        let cipher = test_cipher();
        let mut sealed = cipher.encrypt_and_sign("secret").unwrap();
        sealed.signature = "!!! not base64 !!!".into();

        let err = cipher.decrypt_and_verify(&sealed).unwrap_err();
        assert!(matches!(err, CryptoError::Integrity));
    }

    #[test]
    fn wrong_key_fails() {
        let cipher1 = test_cipher();
        let cipher2 = test_cipher();

        let sealed = cipher1.encrypt_and_sign("secret").unwrap();

        // Different MAC key, so verification rejects it first.
        let err = cipher2.decrypt_and_verify(&sealed).unwrap_err();
        assert!(matches!(err, CryptoError::Integrity));
    }

    #[test]
    fn wrong_cipher_key_with_shared_mac_key_fails_on_decrypt() {
        let keys1 = KeySet::generate();
        let keys2 = KeySet::new(crate::CipherKey::generate(), keys1.mac_key.clone());

        let cipher1 = CatalogCipher::new(keys1);
        let cipher2 = CatalogCipher::new(keys2);

        let sealed = cipher1.encrypt_and_sign("secret").unwrap();

        // Signature passes (same MAC key), padding check then rejects.
        let err = cipher2.decrypt_and_verify(&sealed).unwrap_err();
        assert!(matches!(err, CryptoError::Decryption { .. }));
    }

    #[test]
    fn truncated_payload_is_decode_error() {
        let cipher = test_cipher();

        // Valid base64 but shorter than the IV prefix. Sign it properly so
        // verification passes and the framing check is what rejects it.
        let payload = BASE64.encode([0u8; 8]);
        let signature = BASE64.encode(cipher.sign(&payload).unwrap());
        let sealed = SealedBlob { payload, signature };

        let err = cipher.decrypt_and_verify(&sealed).unwrap_err();
        assert!(matches!(err, CryptoError::Decode { .. }));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let cipher = test_cipher();
        let sealed = cipher.encrypt_and_sign("").unwrap();
        assert_eq!(cipher.decrypt_and_verify(&sealed).unwrap(), "");
    }

    #[test]
    fn large_plaintext_roundtrips() {
        let cipher = test_cipher();
        let plaintext = "x".repeat(1024 * 1024);
        let sealed = cipher.encrypt_and_sign(&plaintext).unwrap();
        assert_eq!(cipher.decrypt_and_verify(&sealed).unwrap(), plaintext);
    }

    #[test]
    fn sealed_blob_serde_roundtrip() {
        let cipher = test_cipher();
        let sealed = cipher.encrypt_and_sign("payload").unwrap();

        let json = serde_json::to_string(&sealed).unwrap();
        let back: SealedBlob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sealed);
        assert_eq!(cipher.decrypt_and_verify(&back).unwrap(), "payload");
    }

    proptest! {
        #[test]
        fn roundtrip_arbitrary_strings(plaintext in ".*") {
            let cipher = test_cipher();
            let sealed = cipher.encrypt_and_sign(&plaintext).unwrap();
            prop_assert_eq!(cipher.decrypt_and_verify(&sealed).unwrap(), plaintext);
        }

        #[test]
        fn any_payload_bitflip_is_detected(
            plaintext in "[a-zA-Z0-9 ]{1,64}",
            flip in 0usize..64,
        ) {
            let cipher = test_cipher();
            let mut sealed = cipher.encrypt_and_sign(&plaintext).unwrap();

            let mut bytes = sealed.payload.clone().into_bytes();
            let idx = flip % bytes.len();
            bytes[idx] ^= 0x01;
            sealed.payload = String::from_utf8_lossy(&bytes).into_owned();

            // Never a silently wrong plaintext: either the signature check
            // rejects it, or (if the flip was a no-op on the string) the
            // original plaintext comes back.
            match cipher.decrypt_and_verify(&sealed) {
                Ok(plain) => prop_assert_eq!(plain, plaintext),
                Err(e) => prop_assert!(matches!(e, CryptoError::Integrity)),
            }
        }
    }
}
