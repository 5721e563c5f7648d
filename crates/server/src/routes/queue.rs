//! Manual queue-processing trigger.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use courier_common::error::AppError;
use courier_engine::processor::CycleOutcome;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/process-queue", post(process_queue))
}

/// POST /process-queue — run one processing cycle immediately.
///
/// Returns the cycle report, or `skipped: true` when a cycle is already in
/// flight. A fetch-stage store error surfaces as HTTP 500.
async fn process_queue(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    match state.processor.try_run_cycle().await? {
        CycleOutcome::Completed(report) => Ok(Json(json!({
            "success": true,
            "skipped": false,
            "report": report,
        }))),
        CycleOutcome::Skipped => Ok(Json(json!({
            "success": true,
            "skipped": true,
            "report": null,
        }))),
    }
}
