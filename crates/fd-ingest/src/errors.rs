//! Ingestion error taxonomy.
//!
//! Duplicates are deliberately *not* errors; they are successful
//! `IngestOutcome`s with `is_new = false`. Everything here aborts the
//! pipeline before any write.

use fd_parser::ParseError;
use shared_crypto::CryptoError;
use thiserror::Error;

use crate::ports::StoreError;

/// Fatal ingestion failures, surfaced to the caller.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The submitted stream could not be read as UTF-8 text.
    #[error("Failed to read submission: {0}")]
    Io(String),

    /// Classification failed or the XML was malformed; nothing persisted.
    #[error("Document processing failed: {0}")]
    Document(#[from] ParseError),

    /// Payload encryption failed; nothing persisted.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Store failure other than a key conflict (conflicts are recovered
    /// locally as duplicate-by-key).
    #[error(transparent)]
    Store(#[from] StoreError),
}
