//! HTTP API module for the fiscal document auditor.
//!
//! This module exposes `POST /audit`, which audits a batch of XML payloads
//! and returns the [`BatchResult`](crate::models::BatchResult).

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::AuditRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
