//! The publishing side of the broker contract.

use async_trait::async_trait;

use crate::BusError;

/// Fire-and-forget publish of a serialized message to the topic exchange.
///
/// Implementations must be durable from the caller's point of view: once
/// `publish` returns `Ok`, the message has been handed to every queue whose
/// binding matches the routing key. A key that matches no binding is not an
/// error; the message is dropped with a warning, mirroring topic-exchange
/// behavior.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    /// Publish a message body under a routing key.
    async fn publish(&self, body: Vec<u8>, routing_key: &str) -> Result<(), BusError>;
}
