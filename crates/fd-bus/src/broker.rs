//! In-memory topic broker with explicit-acknowledgement queues.
//!
//! Single-process stand-in for a durable AMQP topology. Queues are bound to
//! the exchange by routing patterns; deliveries are settled exactly once
//! through a consuming handle; prefetch is fixed at one outstanding
//! unsettled delivery per queue.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, warn};

use crate::publisher::MessagePublisher;
use crate::routing::pattern_matches;
use crate::BusError;

struct QueueInner {
    name: String,
    messages: Mutex<VecDeque<Vec<u8>>>,
    notify: Notify,
    // One permit: the prefetch window. Held by the outstanding delivery
    // handle and released when it settles.
    prefetch: Arc<Semaphore>,
}

impl QueueInner {
    fn push_back(&self, body: Vec<u8>) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push_back(body);
        }
        self.notify.notify_one();
    }

    fn push_front(&self, body: Vec<u8>) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push_front(body);
        }
        self.notify.notify_one();
    }

    fn pop(&self) -> Option<Vec<u8>> {
        self.messages.lock().ok()?.pop_front()
    }
}

struct Binding {
    pattern: String,
    queue: Arc<QueueInner>,
}

/// In-memory implementation of the topic exchange and its queues.
///
/// The broker is the single owned connection resource of the process: open
/// once at startup, shared via `Arc`, dropped at shutdown.
#[derive(Default)]
pub struct InMemoryBroker {
    queues: RwLock<HashMap<String, Arc<QueueInner>>>,
    bindings: RwLock<Vec<Binding>>,
}

impl InMemoryBroker {
    /// Create an empty broker with no queues or bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a queue (idempotent).
    pub fn declare_queue(&self, name: &str) {
        let Ok(mut queues) = self.queues.write() else {
            return;
        };
        queues.entry(name.to_string()).or_insert_with(|| {
            debug!(queue = name, "Queue declared");
            Arc::new(QueueInner {
                name: name.to_string(),
                messages: Mutex::new(VecDeque::new()),
                notify: Notify::new(),
                prefetch: Arc::new(Semaphore::new(1)),
            })
        });
    }

    /// Bind a declared queue to the exchange by a routing pattern.
    ///
    /// # Errors
    ///
    /// `BusError::QueueNotFound` if the queue was never declared.
    pub fn bind_queue(&self, queue: &str, pattern: &str) -> Result<(), BusError> {
        let inner = self
            .queues
            .read()
            .ok()
            .and_then(|queues| queues.get(queue).cloned())
            .ok_or_else(|| BusError::QueueNotFound(queue.to_string()))?;

        if let Ok(mut bindings) = self.bindings.write() {
            debug!(queue, pattern, "Queue bound");
            bindings.push(Binding {
                pattern: pattern.to_string(),
                queue: inner,
            });
        }
        Ok(())
    }

    /// Open a consumer on a declared queue.
    ///
    /// # Errors
    ///
    /// `BusError::QueueNotFound` if the queue was never declared.
    pub fn consumer(&self, queue: &str) -> Result<QueueConsumer, BusError> {
        let inner = self
            .queues
            .read()
            .ok()
            .and_then(|queues| queues.get(queue).cloned())
            .ok_or_else(|| BusError::QueueNotFound(queue.to_string()))?;
        Ok(QueueConsumer { queue: inner })
    }

    /// Number of messages currently queued (excluding in-flight).
    #[must_use]
    pub fn queue_depth(&self, queue: &str) -> usize {
        self.queues
            .read()
            .ok()
            .and_then(|queues| queues.get(queue).cloned())
            .and_then(|q| q.messages.lock().ok().map(|m| m.len()))
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessagePublisher for InMemoryBroker {
    async fn publish(&self, body: Vec<u8>, routing_key: &str) -> Result<(), BusError> {
        let Ok(bindings) = self.bindings.read() else {
            return Err(BusError::Closed);
        };

        let mut matched = 0usize;
        for binding in bindings.iter() {
            if pattern_matches(&binding.pattern, routing_key) {
                binding.queue.push_back(body.clone());
                matched += 1;
            }
        }

        if matched == 0 {
            warn!(routing_key, "Message matched no queue binding, dropped");
        } else {
            debug!(routing_key, queues = matched, "Message published");
        }
        Ok(())
    }
}

/// Consuming side of one queue.
///
/// Each worker instance owns exactly one consumer for its lifetime; sharing
/// a consumer across tasks would break the prefetch-of-one serialization.
pub struct QueueConsumer {
    queue: Arc<QueueInner>,
}

impl QueueConsumer {
    /// Receive the next delivery.
    ///
    /// Waits until a message is available **and** the previous delivery has
    /// been settled (prefetch = 1). Returns `None` only if the broker's
    /// prefetch semaphore is closed, which does not happen in normal
    /// operation.
    pub async fn recv(&self) -> Option<Delivery> {
        let permit = Arc::clone(&self.queue.prefetch).acquire_owned().await.ok()?;

        loop {
            let notified = self.queue.notify.notified();
            if let Some(body) = self.queue.pop() {
                return Some(Delivery {
                    handle: DeliveryHandle {
                        queue: Arc::clone(&self.queue),
                        redelivery: Some(body.clone()),
                        _permit: permit,
                    },
                    body,
                });
            }
            notified.await;
        }
    }
}

/// One broker-handed occurrence of a message.
pub struct Delivery {
    /// Raw message bytes.
    pub body: Vec<u8>,
    /// Settlement handle; must be acked or nacked exactly once.
    pub handle: DeliveryHandle,
}

/// Settlement handle for a delivery.
///
/// `ack` and `nack` consume the handle, so each delivery is settled at most
/// once by construction. Dropping an unsettled handle requeues the message
/// (the consumer crashed mid-processing), preserving at-least-once
/// delivery.
pub struct DeliveryHandle {
    queue: Arc<QueueInner>,
    redelivery: Option<Vec<u8>>,
    _permit: tokio::sync::OwnedSemaphorePermit,
}

impl DeliveryHandle {
    /// Positively acknowledge the delivery.
    pub fn ack(mut self) {
        self.redelivery = None;
        debug!(queue = %self.queue.name, "Delivery acked");
    }

    /// Negatively acknowledge the delivery.
    ///
    /// With `requeue` the message returns to the front of the queue for
    /// redelivery; without it the message is dropped (dead-lettering is the
    /// broker topology's concern, not this component's).
    pub fn nack(mut self, requeue: bool) {
        let body = self.redelivery.take();
        if requeue {
            if let Some(body) = body {
                self.queue.push_front(body);
            }
            debug!(queue = %self.queue.name, "Delivery nacked, requeued");
        } else {
            debug!(queue = %self.queue.name, "Delivery nacked, dropped");
        }
    }
}

impl Drop for DeliveryHandle {
    fn drop(&mut self) {
        // Unsettled handle: the consumer went away without acking.
        if let Some(body) = self.redelivery.take() {
            warn!(queue = %self.queue.name, "Unsettled delivery dropped, requeueing");
            self.queue.push_front(body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    async fn broker_with_bound_queue() -> InMemoryBroker {
        let broker = InMemoryBroker::new();
        broker.declare_queue("fiscal-documents");
        broker
            .bind_queue("fiscal-documents", "fiscal.document.#")
            .unwrap();
        broker
    }

    #[tokio::test]
    async fn test_publish_routes_by_binding_pattern() {
        let broker = broker_with_bound_queue().await;

        broker
            .publish(b"evt".to_vec(), "fiscal.document.processed")
            .await
            .unwrap();
        broker.publish(b"other".to_vec(), "audit.trail").await.unwrap();

        assert_eq!(broker.queue_depth("fiscal-documents"), 1);
    }

    #[tokio::test]
    async fn test_recv_and_ack() {
        let broker = broker_with_bound_queue().await;
        broker
            .publish(b"evt".to_vec(), "fiscal.document.processed")
            .await
            .unwrap();

        let consumer = broker.consumer("fiscal-documents").unwrap();
        let delivery = consumer.recv().await.unwrap();
        assert_eq!(delivery.body, b"evt");
        delivery.handle.ack();

        assert_eq!(broker.queue_depth("fiscal-documents"), 0);
    }

    #[tokio::test]
    async fn test_nack_with_requeue_redelivers() {
        let broker = broker_with_bound_queue().await;
        broker
            .publish(b"evt".to_vec(), "fiscal.document.processed")
            .await
            .unwrap();

        let consumer = broker.consumer("fiscal-documents").unwrap();
        let delivery = consumer.recv().await.unwrap();
        delivery.handle.nack(true);

        let redelivered = consumer.recv().await.unwrap();
        assert_eq!(redelivered.body, b"evt");
        redelivered.handle.ack();
    }

    #[tokio::test]
    async fn test_nack_without_requeue_drops() {
        let broker = broker_with_bound_queue().await;
        broker
            .publish(b"evt".to_vec(), "fiscal.document.processed")
            .await
            .unwrap();

        let consumer = broker.consumer("fiscal-documents").unwrap();
        let delivery = consumer.recv().await.unwrap();
        delivery.handle.nack(false);

        assert_eq!(broker.queue_depth("fiscal-documents"), 0);
        let next = timeout(Duration::from_millis(50), consumer.recv()).await;
        assert!(next.is_err(), "queue should be empty after drop");
    }

    #[tokio::test]
    async fn test_prefetch_blocks_second_recv_until_settled() {
        let broker = broker_with_bound_queue().await;
        for _ in 0..2 {
            broker
                .publish(b"evt".to_vec(), "fiscal.document.processed")
                .await
                .unwrap();
        }

        let consumer = broker.consumer("fiscal-documents").unwrap();
        let first = consumer.recv().await.unwrap();

        // Second delivery is withheld while the first is unsettled.
        let blocked = timeout(Duration::from_millis(50), consumer.recv()).await;
        assert!(blocked.is_err());

        first.handle.ack();
        let second = timeout(Duration::from_millis(100), consumer.recv())
            .await
            .expect("unblocked after ack")
            .unwrap();
        second.handle.ack();
    }

    #[tokio::test]
    async fn test_dropped_unsettled_handle_requeues() {
        let broker = broker_with_bound_queue().await;
        broker
            .publish(b"evt".to_vec(), "fiscal.document.processed")
            .await
            .unwrap();

        let consumer = broker.consumer("fiscal-documents").unwrap();
        {
            let _delivery = consumer.recv().await.unwrap();
            // Dropped without settling: simulated consumer crash.
        }
        assert_eq!(broker.queue_depth("fiscal-documents"), 1);
    }

    #[tokio::test]
    async fn test_unknown_queue_errors() {
        let broker = InMemoryBroker::new();
        assert!(matches!(
            broker.consumer("nope"),
            Err(BusError::QueueNotFound(_))
        ));
        assert!(matches!(
            broker.bind_queue("nope", "#"),
            Err(BusError::QueueNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_publish_with_no_binding_is_not_an_error() {
        let broker = InMemoryBroker::new();
        assert!(broker.publish(b"x".to_vec(), "any.key").await.is_ok());
    }
}
