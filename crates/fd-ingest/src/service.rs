//! CRUD passthroughs over the record store.
//!
//! The gateway's read/update/delete endpoints terminate here; the ingest
//! path has its own coordinator. Updates go through
//! `FiscalRecord::apply_update` so blank fields can never wipe data.

use std::sync::Arc;

use shared_types::{FiscalRecord, PageRequest, RecordFilter, RecordUpdate};
use tracing::info;
use uuid::Uuid;

use crate::ports::{DocumentStore, StoreError};

/// One page of records plus the filter-wide total.
#[derive(Debug, Clone)]
pub struct RecordPage {
    /// Records on this page, newest first.
    pub items: Vec<FiscalRecord>,
    /// Total records matching the filter across all pages.
    pub total: usize,
    /// Echo of the (clamped) page request served.
    pub page: PageRequest,
}

/// Read/update/delete operations exposed to the gateway.
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    /// Service over a store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// Propagates store failures; a missing record is `Ok(None)`.
    pub async fn get_document(&self, id: Uuid) -> Result<Option<FiscalRecord>, StoreError> {
        self.store.get_by_id(id).await
    }

    /// Paged, filtered listing, newest first.
    ///
    /// Raw page inputs are clamped to platform bounds before hitting the
    /// store.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_documents(
        &self,
        page: usize,
        page_size: usize,
        filter: &RecordFilter,
    ) -> Result<RecordPage, StoreError> {
        let page = PageRequest::clamped(page, page_size);
        let (items, total) = self.store.get_paged(page, filter).await?;
        Ok(RecordPage { items, total, page })
    }

    /// Apply a partial update to an existing record.
    ///
    /// Returns the updated record, or `None` if the id is unknown.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn update_document(
        &self,
        id: Uuid,
        update: &RecordUpdate,
    ) -> Result<Option<FiscalRecord>, StoreError> {
        let Some(mut record) = self.store.get_by_id(id).await? else {
            return Ok(None);
        };

        record.apply_update(update);
        self.store.update(record.clone()).await?;
        self.store.commit().await?;

        info!(record_id = %id, "Record updated");
        Ok(Some(record))
    }

    /// Delete a record by id. Returns whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Propagates store failures other than the record being absent.
    pub async fn delete_document(&self, id: Uuid) -> Result<bool, StoreError> {
        match self.store.delete(id).await {
            Ok(()) => {}
            Err(StoreError::NotFound(_)) => return Ok(false),
            Err(e) => return Err(e),
        }
        self.store.commit().await?;

        info!(record_id = %id, "Record deleted");
        Ok(true)
    }
}
