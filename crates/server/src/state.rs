//! Shared application state for the Axum server.

use std::sync::Arc;

use courier_engine::processor::QueueProcessor;

/// Application state shared across all route handlers via Axum `State`.
///
/// Holds the same processor instance the interval scheduler drives, so a
/// manual trigger and a timer tick contend on one gate.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<QueueProcessor>,
}

impl AppState {
    pub fn new(processor: Arc<QueueProcessor>) -> Self {
        Self { processor }
    }
}
