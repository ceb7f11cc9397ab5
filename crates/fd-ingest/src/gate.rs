//! Idempotency gate: two sequential guards, one three-way result.
//!
//! The hash guard runs before any encryption or parsing work; the key
//! guard runs after extraction. Keeping them as ordered guard clauses (not
//! two independent booleans) makes the short-circuit order explicit and
//! testable.

use tracing::info;
use uuid::Uuid;

use crate::ports::{DocumentStore, StoreError};

/// Outcome of admitting one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// No prior record conflicts; proceed.
    New,
    /// A byte-identical payload was already ingested.
    DuplicateByHash(Uuid),
    /// A different payload with the same business key was already ingested.
    DuplicateByKey(Uuid),
}

/// Guard clauses over the store's lookup contract.
pub struct IdempotencyGate<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> IdempotencyGate<'a> {
    /// Gate over a store.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// First guard: byte-identical resubmission check.
    ///
    /// # Errors
    ///
    /// Propagates store lookup failures.
    pub async fn check_hash(&self, content_hash: &str) -> Result<Admission, StoreError> {
        match self.store.get_by_hash(content_hash).await? {
            Some(existing) => {
                info!(hash = content_hash, record_id = %existing.id, "Duplicate by hash, skipping");
                Ok(Admission::DuplicateByHash(existing.id))
            }
            None => Ok(Admission::New),
        }
    }

    /// Second guard: same business identity, different bytes.
    ///
    /// # Errors
    ///
    /// Propagates store lookup failures.
    pub async fn check_key(&self, document_key: &str) -> Result<Admission, StoreError> {
        match self.store.get_by_key(document_key).await? {
            Some(existing) => {
                info!(key = document_key, record_id = %existing.id, "Duplicate by key, skipping");
                Ok(Admission::DuplicateByKey(existing.id))
            }
            None => Ok(Admission::New),
        }
    }
}
