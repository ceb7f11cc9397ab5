//! # Ingestion Subsystem
//!
//! Sequences one submission through hashing, idempotency checks,
//! encryption, classification, persistence, and event emission as a single
//! exactly-once-per-submission workflow.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──▶ hash ──▶ gate(hash) ──▶ encrypt ──▶ classify/extract
//!                      │                             │
//!            duplicate-by-hash                gate(key) ──▶ persist+commit
//!            (no writes, no publish)             │              │
//!                                       duplicate-by-key     publish event
//!                                                               │
//!                                                        IngestOutcome
//! ```
//!
//! ## Module Structure (Hexagonal)
//!
//! | Layer | Module | Contents |
//! |-------|--------|----------|
//! | ports | `ports` | `DocumentStore` trait, `StoreError` |
//! | domain | `gate` | Three-way `Admission` idempotency result |
//! | domain | `coordinator` | `IngestCoordinator`, `IngestOutcome` |
//! | domain | `service` | CRUD passthroughs used by the gateway |
//! | adapters | `store` | `InMemoryDocumentStore` |
//!
//! ## Concurrency
//!
//! The pipeline is synchronous and non-reentrant per request; no in-process
//! lock spans the encrypt/classify/persist/publish sequence. Concurrent
//! submissions race only on the store's key-uniqueness constraint, which is
//! the authoritative backstop: a constraint violation at insert is
//! reinterpreted as duplicate-by-key, never surfaced as a fatal error.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod coordinator;
pub mod errors;
pub mod gate;
pub mod ports;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{IngestCoordinator, IngestOutcome};
pub use errors::IngestError;
pub use gate::{Admission, IdempotencyGate};
pub use ports::{DocumentStore, StoreError};
pub use service::{DocumentService, RecordPage};
pub use store::InMemoryDocumentStore;
