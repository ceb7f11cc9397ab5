//! The ingestion pipeline itself.
//!
//! One `ingest` call takes raw bytes all the way to a committed record and
//! a published event, or to a duplicate outcome with no side effects.
//! Ordering matters: the hash guard runs before encryption and parsing so
//! a byte-identical resubmission costs one digest and one lookup, nothing
//! more.

use std::sync::Arc;

use fd_bus::MessagePublisher;
use serde::Serialize;
use shared_crypto::{compute_hash, PayloadCipher};
use shared_types::constants::routing;
use shared_types::{DocumentProcessedEvent, FiscalRecord};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::IngestError;
use crate::gate::{Admission, IdempotencyGate};
use crate::ports::{DocumentStore, StoreError};

/// Result of one submission, duplicate or new.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutcome {
    /// Id of the record representing this document (existing one for
    /// duplicates).
    pub id: Uuid,
    /// Whether a new record was created by this submission.
    pub is_new: bool,
    /// Machine-readable disposition: `created`, `duplicate-by-hash`, or
    /// `duplicate-by-key`.
    pub message: String,
}

impl IngestOutcome {
    fn created(id: Uuid) -> Self {
        Self {
            id,
            is_new: true,
            message: "created".into(),
        }
    }

    fn duplicate(id: Uuid, message: &str) -> Self {
        Self {
            id,
            is_new: false,
            message: message.into(),
        }
    }
}

/// Drives one submission through hash, gate, encrypt, classify, persist,
/// and publish.
pub struct IngestCoordinator {
    store: Arc<dyn DocumentStore>,
    cipher: Arc<PayloadCipher>,
    publisher: Arc<dyn MessagePublisher>,
}

impl IngestCoordinator {
    /// Wire the coordinator to its store, cipher, and event publisher.
    #[must_use]
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cipher: Arc<PayloadCipher>,
        publisher: Arc<dyn MessagePublisher>,
    ) -> Self {
        Self {
            store,
            cipher,
            publisher,
        }
    }

    /// Ingest one submitted document.
    ///
    /// Duplicates are successful outcomes, not errors. The processed event
    /// is published only for newly created records, after the commit; a
    /// publish failure is logged and swallowed so the accepted submission
    /// is never rolled back by a broker hiccup.
    ///
    /// # Errors
    ///
    /// - `IngestError::Io` when the bytes are not UTF-8 text
    /// - `IngestError::Document` on malformed or unrecognized XML
    /// - `IngestError::Crypto` when payload encryption fails
    /// - `IngestError::Store` on store failures other than a key conflict
    pub async fn ingest(&self, bytes: &[u8], filename: &str) -> Result<IngestOutcome, IngestError> {
        let xml = std::str::from_utf8(bytes)
            .map_err(|e| IngestError::Io(format!("{filename}: {e}")))?;

        let content_hash = compute_hash(xml);
        let gate = IdempotencyGate::new(self.store.as_ref());

        if let Admission::DuplicateByHash(existing) = gate.check_hash(&content_hash).await? {
            return Ok(IngestOutcome::duplicate(existing, "duplicate-by-hash"));
        }

        let encrypted_payload = self.cipher.encrypt(xml)?;
        let extracted = fd_parser::classify_and_extract(xml)?;

        if let Admission::DuplicateByKey(existing) =
            gate.check_key(&extracted.document_key).await?
        {
            return Ok(IngestOutcome::duplicate(existing, "duplicate-by-key"));
        }

        let record = FiscalRecord::create(
            extracted.document_type,
            extracted.document_key,
            extracted.emitter_tax_id,
            extracted.emitter_name,
            extracted.emitter_region,
            extracted.recipient_tax_id,
            extracted.recipient_name,
            extracted.total_value,
            extracted.issue_date,
            encrypted_payload,
            content_hash,
        );
        let record_id = record.id;
        let event = DocumentProcessedEvent::from(&record);

        // The store's uniqueness constraint is the backstop for the race
        // between the key guard above and this insert.
        match self.store.add(record).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey { existing_id }) => {
                return Ok(IngestOutcome::duplicate(existing_id, "duplicate-by-key"));
            }
            Err(e) => return Err(e.into()),
        }
        self.store.commit().await?;

        info!(
            record_id = %record_id,
            document_type = %event.document_type,
            filename,
            "Fiscal document ingested"
        );
        self.publish_event(&event).await;

        Ok(IngestOutcome::created(record_id))
    }

    /// Best-effort event emission; the record is already durable.
    async fn publish_event(&self, event: &DocumentProcessedEvent) {
        let body = match serde_json::to_vec(event) {
            Ok(body) => body,
            Err(e) => {
                warn!(document_id = %event.document_id, error = %e, "Failed to serialize event");
                return;
            }
        };
        if let Err(e) = self
            .publisher
            .publish(body, routing::DOCUMENT_PROCESSED)
            .await
        {
            warn!(document_id = %event.document_id, error = %e, "Failed to publish event");
        }
    }
}
