//! # Payload Encryption
//!
//! AES-256-GCM under one fixed key/nonce pair, so encryption is
//! deterministic: identical plaintext always yields identical ciphertext.
//! Ciphertext is base64 for storage as an opaque string column.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use zeroize::Zeroize;

use crate::CryptoError;

/// Secret key (256-bit), zeroed on drop.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretKey([u8; 32]);

impl SecretKey {
    /// Create from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get inner bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Deterministic payload cipher owning a fixed key/nonce pair.
///
/// One instance is created at startup and shared (it is cheap to clone the
/// underlying key material internally per call). Because the nonce is
/// fixed, `encrypt` is a pure function of the plaintext.
pub struct PayloadCipher {
    key: SecretKey,
    nonce: [u8; 12],
}

impl PayloadCipher {
    /// Build a cipher from a 256-bit key and 96-bit nonce.
    #[must_use]
    pub fn new(key: [u8; 32], nonce: [u8; 12]) -> Self {
        Self {
            key: SecretKey::from_bytes(key),
            nonce,
        }
    }

    /// Encrypt a plaintext payload to base64 ciphertext.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::EncryptionFailed` if the AEAD rejects the
    /// input (practically unreachable for in-memory payloads).
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let cipher = Aes256Gcm::new(self.key.as_bytes().into());
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&self.nonce), plaintext.as_bytes())
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypt a base64 ciphertext back to the exact original plaintext.
    ///
    /// # Errors
    ///
    /// - `CryptoError::InvalidEncoding` if the input is not base64
    /// - `CryptoError::DecryptionFailed` on tampered or truncated data
    /// - `CryptoError::InvalidPlaintext` if the result is not UTF-8
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let bytes = BASE64
            .decode(ciphertext)
            .map_err(|e| CryptoError::InvalidEncoding(e.to_string()))?;
        let cipher = Aes256Gcm::new(self.key.as_bytes().into());
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&self.nonce), bytes.as_ref())
            .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
        String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidPlaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cipher() -> PayloadCipher {
        PayloadCipher::new([0x42; 32], [0x24; 12])
    }

    #[test]
    fn test_round_trip_exact() {
        let plaintext = "<NFe><infNFe Id=\"NFe123\"/></NFe>";
        let encrypted = cipher().encrypt(plaintext).unwrap();
        assert_ne!(encrypted, plaintext);
        assert_eq!(cipher().decrypt(&encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_deterministic_under_fixed_key() {
        let c = cipher();
        assert_eq!(c.encrypt("same payload").unwrap(), c.encrypt("same payload").unwrap());
    }

    #[test]
    fn test_empty_string_round_trip() {
        let encrypted = cipher().encrypt("").unwrap();
        assert_eq!(cipher().decrypt(&encrypted).unwrap(), "");
    }

    #[test]
    fn test_non_ascii_round_trip() {
        let plaintext = "Razão Social: Ângela & Cia — 100% café ☕";
        let encrypted = cipher().encrypt(plaintext).unwrap();
        assert_eq!(cipher().decrypt(&encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let encrypted = cipher().encrypt("secret").unwrap();
        let other = PayloadCipher::new([0x43; 32], [0x24; 12]);
        assert!(matches!(
            other.decrypt(&encrypted),
            Err(CryptoError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let encrypted = cipher().encrypt("secret").unwrap();
        let mut bytes = BASE64.decode(&encrypted).unwrap();
        bytes[0] ^= 0xFF;
        let tampered = BASE64.encode(bytes);
        assert!(cipher().decrypt(&tampered).is_err());
    }

    #[test]
    fn test_invalid_base64_rejected() {
        assert!(matches!(
            cipher().decrypt("not base64!!!"),
            Err(CryptoError::InvalidEncoding(_))
        ));
    }
}
