//! Route handlers for the document API.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use fd_ingest::{DocumentService, IngestCoordinator, IngestOutcome};
use shared_types::RecordUpdate;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::dto::{DocumentDetail, DocumentSummary, ListQuery, ListResponse};
use crate::error::ApiError;

/// Largest accepted upload body (XML plus multipart framing).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Ingestion pipeline entry point.
    pub coordinator: Arc<IngestCoordinator>,
    /// Read/update/delete operations.
    pub service: Arc<DocumentService>,
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/documents/upload", post(upload_document))
        .route("/api/documents", get(list_documents))
        .route(
            "/api/documents/:id",
            get(get_document)
                .put(update_document)
                .delete(delete_document),
        )
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// `POST /api/documents/upload`: multipart field `xmlFile`.
async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestOutcome>, ApiError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("xmlFile") {
            let filename = field.file_name().unwrap_or("upload.xml").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {e}")))?;
            file = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let Some((filename, bytes)) = file else {
        return Err(ApiError::BadRequest("No file uploaded".into()));
    };
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".into()));
    }
    if !filename.to_lowercase().ends_with(".xml") {
        return Err(ApiError::BadRequest(
            "Only .xml files are accepted".into(),
        ));
    }

    info!(filename = %filename, size = bytes.len(), "Document upload received");
    let outcome = state.coordinator.ingest(&bytes, &filename).await?;
    Ok(Json(outcome))
}

/// `GET /api/documents`: paged, filtered listing.
async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let filter = query.to_filter()?;
    let page = state
        .service
        .list_documents(
            query.page.unwrap_or(0),
            query.page_size.unwrap_or(0),
            &filter,
        )
        .await?;

    Ok(Json(ListResponse {
        items: page.items.iter().map(DocumentSummary::from).collect(),
        total_count: page.total,
        page: page.page.page,
        page_size: page.page.page_size,
    }))
}

/// `GET /api/documents/:id`.
async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentDetail>, ApiError> {
    state
        .service
        .get_document(id)
        .await?
        .map(|record| Json(DocumentDetail::from(record)))
        .ok_or(ApiError::NotFound)
}

/// `PUT /api/documents/:id`: partial update.
async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<RecordUpdate>,
) -> Result<Json<DocumentDetail>, ApiError> {
    state
        .service
        .update_document(id, &update)
        .await?
        .map(|record| Json(DocumentDetail::from(record)))
        .ok_or(ApiError::NotFound)
}

/// `DELETE /api/documents/:id`.
async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if state.service.delete_document(id).await? {
        Ok(Json(serde_json::json!({ "deleted": id })))
    } else {
        Err(ApiError::NotFound)
    }
}
