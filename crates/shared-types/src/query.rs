//! Paged query parameters for the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::pagination;
use crate::entities::{DocumentType, FiscalRecord};

/// Filter applied to paged record queries.
///
/// All fields are optional; an empty filter matches everything. The tax id
/// filter matches either side of the document (emitter or recipient), the
/// region filter matches the emitter only, mirroring the store contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    /// Inclusive lower bound on the issue date.
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the issue date.
    pub end_date: Option<DateTime<Utc>>,
    /// Matches emitter or recipient tax id exactly.
    pub tax_id: Option<String>,
    /// Matches the emitter region code exactly.
    pub region: Option<String>,
    /// Restricts to one schema family.
    pub document_type: Option<DocumentType>,
}

impl RecordFilter {
    /// Whether a record passes every populated predicate.
    #[must_use]
    pub fn matches(&self, record: &FiscalRecord) -> bool {
        if let Some(start) = self.start_date {
            if record.issue_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.issue_date > end {
                return false;
            }
        }
        if let Some(tax_id) = &self.tax_id {
            if record.emitter_tax_id != *tax_id && record.recipient_tax_id != *tax_id {
                return false;
            }
        }
        if let Some(region) = &self.region {
            if record.emitter_region != *region {
                return false;
            }
        }
        if let Some(ty) = self.document_type {
            if record.document_type != ty {
                return false;
            }
        }
        true
    }
}

/// One-based page request, clamped to the platform bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// One-based page number.
    pub page: usize,
    /// Items per page.
    pub page_size: usize,
}

impl PageRequest {
    /// Clamp raw client input into valid bounds: page floors at 1, page
    /// size outside `[1, MAX_PAGE_SIZE]` falls back to the default.
    #[must_use]
    pub fn clamped(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(pagination::DEFAULT_PAGE),
            page_size: if page_size == 0 || page_size > pagination::MAX_PAGE_SIZE {
                pagination::DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: pagination::DEFAULT_PAGE,
            page_size: pagination::DEFAULT_PAGE_SIZE,
        }
    }
}
