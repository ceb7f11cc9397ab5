//! Shared fixtures for ingestion tests.

use chrono::Utc;
use rust_decimal::Decimal;
use shared_types::{DocumentType, FiscalRecord};

pub(crate) fn sample_record(key: &str, hash: &str) -> FiscalRecord {
    FiscalRecord::create(
        DocumentType::Nfe,
        key.to_string(),
        "12345678000195".into(),
        "Empresa Teste LTDA".into(),
        "SP".into(),
        "98765432000188".into(),
        "Cliente Final SA".into(),
        Decimal::new(150075, 2),
        Utc::now(),
        "ciphertext".into(),
        hash.to_string(),
    )
}
