//! Core domain entities.
//!
//! `FiscalRecord` is the canonical persisted representation of one ingested
//! document. The original XML payload is stored encrypted and is never
//! re-derived from the extracted fields; the content hash is a digest of the
//! plaintext used only for idempotent-resubmission detection.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{limits, status};

/// The three supported fiscal schema families.
///
/// Each variant carries its own extraction strategy in `fd-parser`; adding a
/// fourth family means adding a variant plus one predicate/strategy pair
/// there, nothing here changes shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// Electronic invoice (`nfeProc` / `NFe` wrapper).
    #[serde(rename = "NFe")]
    Nfe,
    /// Electronic transport waybill (`cteProc` / `CTe` wrapper).
    #[serde(rename = "CTe")]
    Cte,
    /// Electronic service invoice (`infNfse` info block).
    #[serde(rename = "NFSe")]
    Nfse,
}

impl DocumentType {
    /// Canonical tag used in wire payloads and query filters.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nfe => "NFe",
            Self::Cte => "CTe",
            Self::Nfse => "NFSe",
        }
    }

    /// Parse the canonical tag back into a variant.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "NFe" => Some(Self::Nfe),
            "CTe" => Some(Self::Cte),
            "NFSe" => Some(Self::Nfse),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The canonical persisted fiscal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiscalRecord {
    /// Opaque identifier, generated at creation, immutable.
    pub id: Uuid,
    /// Schema family this record was extracted from.
    pub document_type: DocumentType,
    /// Business-identity key (unique across records, store-enforced).
    pub document_key: String,
    /// Emitter tax id (may be empty when the source omits it).
    pub emitter_tax_id: String,
    /// Emitter legal name.
    pub emitter_name: String,
    /// Emitter region code (two-letter state code in the source schemas).
    pub emitter_region: String,
    /// Recipient tax id.
    pub recipient_tax_id: String,
    /// Recipient legal name.
    pub recipient_name: String,
    /// Total monetary value; missing in source maps to zero, never an error.
    pub total_value: Decimal,
    /// Issue timestamp from the source document.
    pub issue_date: DateTime<Utc>,
    /// Set once at construction, server clock.
    pub created_at: DateTime<Utc>,
    /// Set on every successful mutation, and only then.
    pub updated_at: Option<DateTime<Utc>>,
    /// Encrypted original payload, stored verbatim.
    pub encrypted_payload: String,
    /// SHA-256 hex digest of the plaintext payload (dedup only).
    pub content_hash: String,
    /// Free-form processing status, `"Pending"` at creation.
    pub processing_status: String,
    /// Client-supplied opaque string.
    pub additional_data: Option<String>,
}

/// Field-wise optional overwrite applied through the update endpoint.
///
/// Blank or missing fields leave the record untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordUpdate {
    /// New emitter name, if any.
    pub emitter_name: Option<String>,
    /// New recipient name, if any.
    pub recipient_name: Option<String>,
    /// New processing status, if any.
    pub processing_status: Option<String>,
    /// New additional data, if any.
    pub additional_data: Option<String>,
}

impl FiscalRecord {
    /// Construct a new record with a fresh id, `"Pending"` status, and
    /// `created_at` stamped from the server clock.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn create(
        document_type: DocumentType,
        document_key: String,
        emitter_tax_id: String,
        emitter_name: String,
        emitter_region: String,
        recipient_tax_id: String,
        recipient_name: String,
        total_value: Decimal,
        issue_date: DateTime<Utc>,
        encrypted_payload: String,
        content_hash: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_type,
            document_key,
            emitter_tax_id,
            emitter_name,
            emitter_region,
            recipient_tax_id,
            recipient_name,
            total_value,
            issue_date,
            created_at: Utc::now(),
            updated_at: None,
            encrypted_payload,
            content_hash,
            processing_status: status::PENDING.to_string(),
            additional_data: None,
        }
    }

    /// Apply a client update. Blank strings are ignored so a partial body
    /// cannot wipe existing fields; party names are bounded to the storage
    /// column limit. Stamps `updated_at`.
    pub fn apply_update(&mut self, update: &RecordUpdate) {
        if let Some(name) = non_blank(&update.emitter_name) {
            self.emitter_name = bounded_name(name);
        }
        if let Some(name) = non_blank(&update.recipient_name) {
            self.recipient_name = bounded_name(name);
        }
        if let Some(st) = non_blank(&update.processing_status) {
            self.processing_status = st.to_string();
        }
        if let Some(data) = non_blank(&update.additional_data) {
            self.additional_data = Some(data.to_string());
        }
        self.updated_at = Some(Utc::now());
    }

    /// Transition `Pending -> Processed`.
    pub fn mark_processed(&mut self) {
        self.processing_status = status::PROCESSED.to_string();
        self.updated_at = Some(Utc::now());
    }

    /// Transition `Pending -> Error`.
    pub fn mark_error(&mut self) {
        self.processing_status = status::ERROR.to_string();
        self.updated_at = Some(Utc::now());
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

fn bounded_name(name: &str) -> String {
    name.chars().take(limits::MAX_NAME).collect()
}
