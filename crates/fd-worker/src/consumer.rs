//! The consume/retry/settle loop.
//!
//! Each delivery moves through `Received -> Processing -> {Acked,
//! Rejected}` before the next one is taken (the broker's prefetch of one
//! enforces the serialization). Settlement is exactly once by construction:
//! the handle is consumed by `ack`/`nack`.
//!
//! Shutdown is observed between messages only. A delivery already inside
//! its retry loop runs to completion, so the backoff sleeps delay shutdown
//! by at most one message's retry budget.

use std::sync::Arc;

use fd_bus::{Delivery, QueueConsumer};
use shared_types::DocumentProcessedEvent;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::handler::EventHandler;
use crate::retry::RetryPolicy;

/// Single-consumer worker over one queue.
pub struct ConsumerWorker {
    consumer: QueueConsumer,
    handler: Arc<dyn EventHandler>,
    retry: RetryPolicy,
    shutdown: watch::Receiver<bool>,
}

impl ConsumerWorker {
    /// Assemble a worker from its queue consumer, handler, and policy.
    #[must_use]
    pub fn new(
        consumer: QueueConsumer,
        handler: Arc<dyn EventHandler>,
        retry: RetryPolicy,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            consumer,
            handler,
            retry,
            shutdown,
        }
    }

    /// Consume until the shutdown signal flips.
    pub async fn run(mut self) {
        info!("Consumer worker started");
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
                delivery = self.consumer.recv() => {
                    let Some(delivery) = delivery else { break };
                    self.process(delivery).await;
                }
            }
        }
        info!("Consumer worker stopped");
    }

    /// Settle one delivery: parse, retry the handler, ack or reject.
    async fn process(&self, delivery: Delivery) {
        let event: DocumentProcessedEvent = match serde_json::from_slice(&delivery.body) {
            Ok(event) => event,
            Err(e) => {
                // Unparsable payloads can never succeed on redelivery.
                warn!(error = %e, "Undeserializable message, rejecting without requeue");
                delivery.handle.nack(false);
                return;
            }
        };

        let handler = Arc::clone(&self.handler);
        match self.retry.run(|| handler.handle(&event)).await {
            Ok(()) => delivery.handle.ack(),
            Err(e) => {
                error!(document_id = %event.document_id, error = %e, "Event rejected");
                delivery.handle.nack(false);
            }
        }
    }
}
