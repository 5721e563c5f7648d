use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Common error type shared by the queue store and the HTTP surface.
///
/// Per-job delivery failures never become an `AppError` — they are recorded
/// on the job row instead. This type covers the cycle-scoped failures
/// (store unreachable, query error) that the manual trigger endpoint
/// surfaces as HTTP 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
