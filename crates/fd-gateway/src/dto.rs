//! Wire DTOs for the document API.
//!
//! The persisted record never crosses the HTTP boundary directly: list
//! items omit the payload and hash entirely, and the detail view omits the
//! encrypted payload. All wire shapes are camelCase.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared_types::{DocumentType, FiscalRecord, RecordFilter};
use uuid::Uuid;

use crate::error::ApiError;

/// Query parameters accepted by the list endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// One-based page number.
    pub page: Option<usize>,
    /// Items per page.
    pub page_size: Option<usize>,
    /// Inclusive lower bound on the issue date (RFC 3339).
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the issue date (RFC 3339).
    pub end_date: Option<DateTime<Utc>>,
    /// Emitter-or-recipient tax id, exact match.
    pub tax_id: Option<String>,
    /// Emitter region code, exact match.
    pub region: Option<String>,
    /// Schema family tag (`NFe`, `CTe`, `NFSe`).
    pub document_type: Option<String>,
}

impl ListQuery {
    /// Convert into the store filter, rejecting unknown type tags.
    pub fn to_filter(&self) -> Result<RecordFilter, ApiError> {
        let document_type = match &self.document_type {
            Some(tag) => Some(DocumentType::from_tag(tag).ok_or_else(|| {
                ApiError::BadRequest(format!("Unknown document type: {tag}"))
            })?),
            None => None,
        };
        Ok(RecordFilter {
            start_date: self.start_date,
            end_date: self.end_date,
            tax_id: self.tax_id.clone(),
            region: self.region.clone(),
            document_type,
        })
    }
}

/// Slim list item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    pub id: Uuid,
    pub document_type: DocumentType,
    pub document_key: String,
    pub emitter_tax_id: String,
    pub emitter_name: String,
    pub emitter_region: String,
    pub total_value: Decimal,
    pub issue_date: DateTime<Utc>,
    pub processing_status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&FiscalRecord> for DocumentSummary {
    fn from(record: &FiscalRecord) -> Self {
        Self {
            id: record.id,
            document_type: record.document_type,
            document_key: record.document_key.clone(),
            emitter_tax_id: record.emitter_tax_id.clone(),
            emitter_name: record.emitter_name.clone(),
            emitter_region: record.emitter_region.clone(),
            total_value: record.total_value,
            issue_date: record.issue_date,
            processing_status: record.processing_status.clone(),
            created_at: record.created_at,
        }
    }
}

/// Paged list envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub items: Vec<DocumentSummary>,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
}

/// Full single-record view; the encrypted payload stays server-side.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDetail {
    pub id: Uuid,
    pub document_type: DocumentType,
    pub document_key: String,
    pub emitter_tax_id: String,
    pub emitter_name: String,
    pub emitter_region: String,
    pub recipient_tax_id: String,
    pub recipient_name: String,
    pub total_value: Decimal,
    pub issue_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub content_hash: String,
    pub processing_status: String,
    pub additional_data: Option<String>,
}

impl From<FiscalRecord> for DocumentDetail {
    fn from(record: FiscalRecord) -> Self {
        Self {
            id: record.id,
            document_type: record.document_type,
            document_key: record.document_key,
            emitter_tax_id: record.emitter_tax_id,
            emitter_name: record.emitter_name,
            emitter_region: record.emitter_region,
            recipient_tax_id: record.recipient_tax_id,
            recipient_name: record.recipient_name,
            total_value: record.total_value,
            issue_date: record.issue_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
            content_hash: record.content_hash,
            processing_status: record.processing_status,
            additional_data: record.additional_data,
        }
    }
}
