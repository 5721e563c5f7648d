//! Integration tests for the HTTP surface.
//!
//! Uses `tower::ServiceExt` to exercise Axum routes without a real HTTP
//! server, backed by in-memory store and delivery mocks — no database or
//! push provider required.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use tower::ServiceExt;
use uuid::Uuid;

use courier_common::error::AppError;
use courier_common::types::{JobStatus, NotificationJob};
use courier_engine::delivery::{DeliveryError, PushDelivery, PushMessage};
use courier_engine::processor::QueueProcessor;
use courier_engine::store::QueueStore;

use courier_server::routes::create_router;
use courier_server::state::AppState;

// ============================================================
// Mocks
// ============================================================

struct MemoryStore {
    jobs: Vec<NotificationJob>,
    fail_fetch: bool,
    sent: Mutex<Vec<Uuid>>,
    failed: Mutex<Vec<Uuid>>,
}

#[async_trait]
impl QueueStore for MemoryStore {
    async fn fetch_pending(&self, _limit: i64) -> Result<Vec<NotificationJob>, AppError> {
        if self.fail_fetch {
            return Err(AppError::Internal("store unavailable".to_string()));
        }
        Ok(self.jobs.clone())
    }

    async fn mark_sent(&self, id: Uuid, _sent_at: DateTime<Utc>) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(id);
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        _attempts: i32,
        _error_message: &str,
    ) -> Result<(), AppError> {
        self.failed.lock().unwrap().push(id);
        Ok(())
    }
}

struct AcceptAllDelivery;

#[async_trait]
impl PushDelivery for AcceptAllDelivery {
    async fn send(&self, _message: &PushMessage) -> Result<(), DeliveryError> {
        Ok(())
    }
}

fn make_job(token: &str, age_secs: i64) -> NotificationJob {
    NotificationJob {
        id: Uuid::new_v4(),
        status: JobStatus::Pending,
        created_at: Utc::now() - Duration::seconds(age_secs),
        recipient_token: token.to_string(),
        title: "test title".to_string(),
        body: "test body".to_string(),
        data: Json(HashMap::new()),
        kind: "chat".to_string(),
        attempts: 0,
        sent_at: None,
        error_message: None,
    }
}

fn make_app(jobs: Vec<NotificationJob>, fail_fetch: bool) -> axum::Router {
    let store = Arc::new(MemoryStore {
        jobs,
        fail_fetch,
        sent: Mutex::new(Vec::new()),
        failed: Mutex::new(Vec::new()),
    });
    let processor = Arc::new(QueueProcessor::new(store, Arc::new(AcceptAllDelivery), 10));
    create_router(AppState::new(processor))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

// ============================================================
// Tests
// ============================================================

#[tokio::test]
async fn health_returns_ok() {
    let app = make_app(Vec::new(), false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "push-courier");
}

#[tokio::test]
async fn process_queue_returns_cycle_report() {
    let app = make_app(vec![make_job("t1", 20), make_job("t2", 10)], false);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process-queue")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["skipped"], false);
    assert_eq!(json["report"]["fetched"], 2);
    assert_eq!(json["report"]["sent"], 2);
    assert_eq!(json["report"]["failed"], 0);
}

#[tokio::test]
async fn process_queue_with_empty_queue_reports_zeroes() {
    let app = make_app(Vec::new(), false);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process-queue")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["report"]["fetched"], 0);
    assert_eq!(json["report"]["sent"], 0);
}

#[tokio::test]
async fn process_queue_surfaces_fetch_error_as_500() {
    let app = make_app(Vec::new(), true);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/process-queue")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("store unavailable")
    );
}
