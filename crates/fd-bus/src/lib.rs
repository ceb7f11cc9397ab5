//! # FD Bus - Durable Topic Broker Contract
//!
//! Publish/subscribe plumbing between the ingestion coordinator and the
//! downstream worker.
//!
//! ## Model
//!
//! ```text
//! ┌─────────────┐  publish(body, routing_key)   ┌──────────────┐
//! │ Coordinator │ ─────────────────────────────▶│   Exchange   │
//! └─────────────┘                               └──────┬───────┘
//!                                        binding match │
//!                                                      ▼
//!                                               ┌──────────────┐
//!                     recv() ─▶ Delivery ◀───── │    Queue     │
//!                       │                       └──────────────┘
//!                       ▼
//!                 ack() / nack(requeue)
//! ```
//!
//! - Publishing is fire-and-forget to a topic exchange; queues are bound by
//!   routing patterns (`*` one segment, `#` any suffix).
//! - Deliveries carry an explicit handle that must be settled exactly once;
//!   settling consumes the handle, so double-ack does not compile.
//! - Prefetch is one: a consumer sees the next delivery only after settling
//!   the previous one. An unsettled handle that is dropped requeues its
//!   message, giving at-least-once semantics.
//!
//! `InMemoryBroker` implements both sides for single-process deployments;
//! a distributed deployment would put an AMQP broker behind the same
//! traits.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod broker;
pub mod publisher;
pub mod routing;

pub use broker::{Delivery, DeliveryHandle, InMemoryBroker, QueueConsumer};
pub use publisher::MessagePublisher;
pub use routing::pattern_matches;

use thiserror::Error;

/// Broker operation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BusError {
    /// The named queue was never declared.
    #[error("Queue not declared: {0}")]
    QueueNotFound(String),

    /// The broker was shut down.
    #[error("Broker closed")]
    Closed,
}
