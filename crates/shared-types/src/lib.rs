//! # Shared Types - FiscalDoc Domain Model
//!
//! Canonical entities, events, and constants shared by every subsystem.
//!
//! ## Components
//!
//! | Module | Contents |
//! |--------|----------|
//! | `entities` | `FiscalRecord`, `DocumentType`, `RecordUpdate` |
//! | `events` | `DocumentProcessedEvent` (camelCase JSON wire shape) |
//! | `query` | `RecordFilter`, `PageRequest` for paged store lookups |
//! | `constants` | Routing keys, queue/exchange names, pagination bounds |
//!
//! ## Invariants
//!
//! - `FiscalRecord::create` is the only way to mint a record; `created_at`
//!   is set exactly once and never touched again.
//! - Every mutating method (`apply_update`, `mark_processed`, `mark_error`)
//!   stamps `updated_at`; nothing else does.
//! - `DocumentProcessedEvent` is an append-only fact; consumers must treat
//!   deliveries as replayable (at-least-once broker semantics).

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod constants;
pub mod entities;
pub mod events;
pub mod query;

pub use entities::{DocumentType, FiscalRecord, RecordUpdate};
pub use events::DocumentProcessedEvent;
pub use query::{PageRequest, RecordFilter};
