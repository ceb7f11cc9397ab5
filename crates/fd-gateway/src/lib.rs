//! # FD Gateway - HTTP Document API
//!
//! axum surface over the ingestion coordinator and the record store.
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | POST | `/api/documents/upload` | Multipart XML submission (`xmlFile`) |
//! | GET | `/api/documents` | Paged, filtered listing |
//! | GET | `/api/documents/:id` | Single-record detail |
//! | PUT | `/api/documents/:id` | Partial update |
//! | DELETE | `/api/documents/:id` | Deletion |
//!
//! Every error leaves as a JSON `{ "error": ... }` body with the matching
//! status code; duplicates are 200s with `isNew=false`, not errors.

pub mod dto;
pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{router, AppState};
