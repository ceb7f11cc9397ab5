//! # FD Worker - Downstream Event Consumer
//!
//! Consumes `DocumentProcessedEvent`s from the broker queue and applies a
//! side-effect handler under a bounded-retry policy.
//!
//! ## Delivery State Machine
//!
//! ```text
//!              deserialize          retry.run(handler)
//! Received ───────────────▶ Processing ───────┬─────▶ Acked    (ack)
//!    │                                        │
//!    │ parse failure                          │ attempts exhausted
//!    ▼                                        ▼
//! Rejected (nack, no requeue)          Rejected (nack, no requeue)
//! ```
//!
//! Every delivery is settled exactly once; a poison message costs at most
//! `max_attempts` handler calls plus the backoff sleeps, then leaves the
//! queue for good (dead-lettering is broker topology, not this crate).

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod consumer;
pub mod handler;
pub mod retry;

pub use consumer::ConsumerWorker;
pub use handler::{EventHandler, HandlerError, SummaryHandler};
pub use retry::{RetryError, RetryPolicy};
