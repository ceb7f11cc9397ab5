//! Platform-wide constants.
//!
//! Routing keys and queue names mirror the broker topology: a durable topic
//! exchange with one queue bound by a multi-segment wildcard pattern.

/// Message routing.
pub mod routing {
    /// Topic exchange all document events are published to.
    pub const EXCHANGE: &str = "fiscal-exchange";

    /// Queue consumed by the summary worker.
    pub const QUEUE: &str = "fiscal-documents";

    /// Routing key for newly processed documents.
    pub const DOCUMENT_PROCESSED: &str = "fiscal.document.processed";

    /// Binding pattern for the worker queue (`#` matches any suffix).
    pub const BINDING_PATTERN: &str = "fiscal.document.#";
}

/// Pagination bounds for list queries.
pub mod pagination {
    /// First page when none is requested.
    pub const DEFAULT_PAGE: usize = 1;

    /// Page size when none is requested.
    pub const DEFAULT_PAGE_SIZE: usize = 10;

    /// Hard upper bound on page size.
    pub const MAX_PAGE_SIZE: usize = 100;
}

/// Processing status values carried by `FiscalRecord::processing_status`.
///
/// Free-form at the storage layer; these are the transitions the platform
/// itself performs (Pending -> Processed, Pending -> Error). Clients may
/// overwrite the status through the update endpoint.
pub mod status {
    /// Initial status at record creation.
    pub const PENDING: &str = "Pending";

    /// Set after downstream processing succeeds.
    pub const PROCESSED: &str = "Processed";

    /// Set after downstream processing fails terminally.
    pub const ERROR: &str = "Error";
}

/// Field length bounds enforced at extraction and update time.
pub mod limits {
    /// Maximum document-key length.
    pub const MAX_DOCUMENT_KEY: usize = 50;

    /// Maximum party name length.
    pub const MAX_NAME: usize = 200;
}
