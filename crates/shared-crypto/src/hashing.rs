//! # Content Hashing
//!
//! SHA-256 digests of submitted plaintext, rendered as 64-character
//! lowercase hex. The digest feeds the idempotency gate only; it is not an
//! integrity check on the stored ciphertext.

use sha2::{Digest, Sha256};

/// Length of the hex-encoded digest.
pub const HASH_HEX_LEN: usize = 64;

/// Hash a plaintext payload.
///
/// Deterministic, collision-resistant, and defined for the empty string.
#[must_use]
pub fn compute_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
