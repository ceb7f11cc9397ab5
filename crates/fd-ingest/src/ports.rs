//! Outbound port: the record-store access contract.
//!
//! The coordinator and the CRUD service depend on this trait only; the
//! storage engine behind it (in-memory here, SQL in a full deployment) is
//! an adapter concern.

use async_trait::async_trait;
use shared_types::{FiscalRecord, PageRequest, RecordFilter};
use thiserror::Error;
use uuid::Uuid;

/// Record-store operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Insert violated the document-key uniqueness constraint.
    ///
    /// Carries the id of the record already holding the key so callers can
    /// reinterpret the conflict as a duplicate submission.
    #[error("Document key already exists on record {existing_id}")]
    DuplicateKey {
        /// Record currently holding the conflicting key.
        existing_id: Uuid,
    },

    /// The referenced record does not exist.
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    /// Backend failure (connection, constraint other than key, ...).
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Access contract the ingestion core requires from the record store.
///
/// Writes (`add`, `update`, `delete`) are staged; `commit` makes them
/// visible to reads. `add` enforces document-key uniqueness against both
/// committed and staged rows, which is the race backstop between the
/// gate's read and the insert.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Look up one record by id.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<FiscalRecord>, StoreError>;

    /// Look up one record by plaintext content hash.
    async fn get_by_hash(&self, hash: &str) -> Result<Option<FiscalRecord>, StoreError>;

    /// Look up one record by document key.
    async fn get_by_key(&self, key: &str) -> Result<Option<FiscalRecord>, StoreError>;

    /// Paged, filtered query ordered by creation time descending.
    ///
    /// Returns the page items and the total count of records matching the
    /// filter (across all pages).
    async fn get_paged(
        &self,
        page: PageRequest,
        filter: &RecordFilter,
    ) -> Result<(Vec<FiscalRecord>, usize), StoreError>;

    /// Stage a new record for insertion.
    async fn add(&self, record: FiscalRecord) -> Result<(), StoreError>;

    /// Stage an update to an existing record.
    async fn update(&self, record: FiscalRecord) -> Result<(), StoreError>;

    /// Stage a deletion.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;

    /// Flush staged writes, making them visible to reads.
    async fn commit(&self) -> Result<(), StoreError>;
}
