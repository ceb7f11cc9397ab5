//! Per-event side-effect handlers.

use async_trait::async_trait;
use shared_types::DocumentProcessedEvent;
use thiserror::Error;
use tracing::info;

/// Handler-level failure; triggers the worker's retry policy.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

/// Side effect applied to each consumed event.
///
/// Delivery is at-least-once, so implementations must tolerate replays of
/// the same event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process one event occurrence.
    async fn handle(&self, event: &DocumentProcessedEvent) -> Result<(), HandlerError>;
}

/// Logs a one-line business summary per processed document.
#[derive(Default)]
pub struct SummaryHandler;

#[async_trait]
impl EventHandler for SummaryHandler {
    async fn handle(&self, event: &DocumentProcessedEvent) -> Result<(), HandlerError> {
        info!(
            document_id = %event.document_id,
            document_type = %event.document_type,
            document_key = %event.document_key,
            emitter = %format_tax_id(&event.emitter_tax_id),
            total_value = %event.total_value,
            processed_at = %event.processed_at,
            "Fiscal document processed"
        );
        Ok(())
    }
}

/// Format a 14-digit company tax id as `NN.NNN.NNN/NNNN-NN`; anything else
/// passes through unchanged.
fn format_tax_id(raw: &str) -> String {
    if raw.len() == 14 && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!(
            "{}.{}.{}/{}-{}",
            &raw[0..2],
            &raw[2..5],
            &raw[5..8],
            &raw[8..12],
            &raw[12..14]
        )
    } else {
        raw.to_string()
    }
}
