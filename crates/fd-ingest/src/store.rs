//! In-memory record store adapter.
//!
//! Staged-write semantics: `add`/`update`/`delete` buffer operations that
//! become visible to reads only at `commit`, mirroring a unit-of-work over
//! a transactional backend. Key uniqueness is enforced at `add` time
//! against committed and staged rows alike, which is what makes the store
//! the authoritative backstop for the gate's read-then-insert race.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use shared_types::{FiscalRecord, PageRequest, RecordFilter};
use tracing::debug;
use uuid::Uuid;

use crate::ports::{DocumentStore, StoreError};

enum StagedOp {
    Add(FiscalRecord),
    Update(FiscalRecord),
    Delete(Uuid),
}

/// HashMap-backed store for single-process deployments and tests.
#[derive(Default)]
pub struct InMemoryDocumentStore {
    committed: RwLock<HashMap<Uuid, FiscalRecord>>,
    staged: Mutex<Vec<StagedOp>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Backend("store lock poisoned".into())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<FiscalRecord>, StoreError> {
        let committed = self.committed.read().map_err(|_| Self::poisoned())?;
        Ok(committed.get(&id).cloned())
    }

    async fn get_by_hash(&self, hash: &str) -> Result<Option<FiscalRecord>, StoreError> {
        let committed = self.committed.read().map_err(|_| Self::poisoned())?;
        Ok(committed.values().find(|r| r.content_hash == hash).cloned())
    }

    async fn get_by_key(&self, key: &str) -> Result<Option<FiscalRecord>, StoreError> {
        let committed = self.committed.read().map_err(|_| Self::poisoned())?;
        Ok(committed.values().find(|r| r.document_key == key).cloned())
    }

    async fn get_paged(
        &self,
        page: PageRequest,
        filter: &RecordFilter,
    ) -> Result<(Vec<FiscalRecord>, usize), StoreError> {
        let committed = self.committed.read().map_err(|_| Self::poisoned())?;

        let mut matching: Vec<FiscalRecord> = committed
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.page_size)
            .collect();
        Ok((items, total))
    }

    async fn add(&self, record: FiscalRecord) -> Result<(), StoreError> {
        // Uniqueness backstop. The staged lock is held across the whole
        // check-then-stage, and `commit` holds the same lock across its
        // drain-and-apply, so no interleaving admits a second key holder:
        // a concurrent add either sees the record still staged or already
        // committed, never in between. Lock order is staged then committed
        // in both paths.
        let mut staged = self.staged.lock().map_err(|_| Self::poisoned())?;

        {
            let committed = self.committed.read().map_err(|_| Self::poisoned())?;
            if let Some(existing) = committed
                .values()
                .find(|r| r.document_key == record.document_key)
            {
                return Err(StoreError::DuplicateKey {
                    existing_id: existing.id,
                });
            }
        }

        for op in staged.iter() {
            if let StagedOp::Add(staged_record) = op {
                if staged_record.document_key == record.document_key {
                    return Err(StoreError::DuplicateKey {
                        existing_id: staged_record.id,
                    });
                }
            }
        }

        debug!(record_id = %record.id, key = %record.document_key, "Record staged for insert");
        staged.push(StagedOp::Add(record));
        Ok(())
    }

    async fn update(&self, record: FiscalRecord) -> Result<(), StoreError> {
        {
            let committed = self.committed.read().map_err(|_| Self::poisoned())?;
            if !committed.contains_key(&record.id) {
                return Err(StoreError::NotFound(record.id));
            }
        }
        let mut staged = self.staged.lock().map_err(|_| Self::poisoned())?;
        staged.push(StagedOp::Update(record));
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        {
            let committed = self.committed.read().map_err(|_| Self::poisoned())?;
            if !committed.contains_key(&id) {
                return Err(StoreError::NotFound(id));
            }
        }
        let mut staged = self.staged.lock().map_err(|_| Self::poisoned())?;
        staged.push(StagedOp::Delete(id));
        Ok(())
    }

    async fn commit(&self) -> Result<(), StoreError> {
        // Staged lock held across the apply; see the protocol note in `add`.
        let mut staged = self.staged.lock().map_err(|_| Self::poisoned())?;
        let mut committed = self.committed.write().map_err(|_| Self::poisoned())?;
        for op in staged.drain(..) {
            match op {
                StagedOp::Add(record) | StagedOp::Update(record) => {
                    committed.insert(record.id, record);
                }
                StagedOp::Delete(id) => {
                    committed.remove(&id);
                }
            }
        }
        Ok(())
    }
}
