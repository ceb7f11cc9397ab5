//! Domain events published to the broker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{DocumentType, FiscalRecord};

/// Fact emitted exactly once per newly created [`FiscalRecord`].
///
/// Wire shape is camelCase JSON:
/// `{documentId, documentType, documentKey, emitterTaxId, totalValue,
/// processedAt}`. The broker gives at-least-once delivery, so consumers
/// must handle replays idempotently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentProcessedEvent {
    /// Identifier of the persisted record.
    pub document_id: Uuid,
    /// Schema family of the document.
    pub document_type: DocumentType,
    /// Business-identity key.
    pub document_key: String,
    /// Emitter tax id.
    pub emitter_tax_id: String,
    /// Total monetary value.
    pub total_value: Decimal,
    /// When the record was processed.
    pub processed_at: DateTime<Utc>,
}

impl From<&FiscalRecord> for DocumentProcessedEvent {
    fn from(record: &FiscalRecord) -> Self {
        Self {
            document_id: record.id,
            document_type: record.document_type,
            document_key: record.document_key.clone(),
            emitter_tax_id: record.emitter_tax_id.clone(),
            total_value: record.total_value,
            processed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_is_camel_case() {
        let event = DocumentProcessedEvent {
            document_id: Uuid::nil(),
            document_type: DocumentType::Nfe,
            document_key: "key".into(),
            emitter_tax_id: "12345678000195".into(),
            total_value: Decimal::new(10050, 2),
            processed_at: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("documentId").is_some());
        assert!(json.get("documentType").is_some());
        assert!(json.get("documentKey").is_some());
        assert!(json.get("emitterTaxId").is_some());
        assert!(json.get("totalValue").is_some());
        assert!(json.get("processedAt").is_some());
        assert_eq!(json["documentType"], "NFe");
    }

    #[test]
    fn test_round_trip() {
        let event = DocumentProcessedEvent {
            document_id: Uuid::new_v4(),
            document_type: DocumentType::Cte,
            document_key: "35220312345678000195".into(),
            emitter_tax_id: "12345678000195".into(),
            total_value: Decimal::new(999999, 2),
            processed_at: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let back: DocumentProcessedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
