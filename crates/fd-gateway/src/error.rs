//! HTTP error mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fd_ingest::{IngestError, StoreError};
use serde_json::json;
use tracing::error;

/// Error surfaced to HTTP clients as a JSON body.
#[derive(Debug)]
pub enum ApiError {
    /// The client sent something unusable (400).
    BadRequest(String),
    /// The referenced resource does not exist (404).
    NotFound,
    /// Unexpected server-side failure (500); details stay in the logs.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound => (StatusCode::NOT_FOUND, "Document not found".to_string()),
            Self::Internal(detail) => {
                error!(detail = %detail, "Internal error serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<IngestError> for ApiError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::Io(detail) => Self::BadRequest(detail),
            IngestError::Document(e) => Self::BadRequest(e.to_string()),
            IngestError::Crypto(e) => Self::Internal(e.to_string()),
            IngestError::Store(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Internal(e.to_string())
    }
}
