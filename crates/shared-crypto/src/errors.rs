//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key, tampered or truncated ciphertext)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Ciphertext is not valid base64
    #[error("Invalid ciphertext encoding: {0}")]
    InvalidEncoding(String),

    /// Decrypted bytes are not valid UTF-8
    #[error("Decrypted payload is not valid UTF-8")]
    InvalidPlaintext,
}
