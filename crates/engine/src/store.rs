//! Queue store client: the read/update operations this worker performs
//! against the `notification_queue` table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use courier_common::error::AppError;
use courier_common::types::{JobStatus, NotificationJob};

/// Store operations consumed by the queue processor.
///
/// The store is the sole owner of job rows: the processor never changes a
/// status except through one of these calls, and holds no copy of a job
/// beyond the cycle that fetched it.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Fetch up to `limit` pending jobs, oldest first.
    async fn fetch_pending(&self, limit: i64) -> Result<Vec<NotificationJob>, AppError>;

    /// Record a successful delivery: status becomes `sent`, `sent_at` is
    /// set, and any stale `error_message` from an earlier attempt is
    /// cleared.
    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<(), AppError>;

    /// Record a failed delivery: status becomes `failed` with the new
    /// absolute attempt count and the failure reason.
    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error_message: &str,
    ) -> Result<(), AppError>;
}

/// PostgreSQL-backed queue store over a shared connection pool.
pub struct PgQueueStore {
    pool: PgPool,
}

impl PgQueueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueStore for PgQueueStore {
    async fn fetch_pending(&self, limit: i64) -> Result<Vec<NotificationJob>, AppError> {
        // Defaults for nullable columns are applied here, at the read
        // boundary, so downstream code never handles a missing value.
        let jobs = sqlx::query_as::<_, NotificationJob>(
            r#"
            SELECT id, status, created_at, recipient_token, title, body,
                   COALESCE(data, '{}'::jsonb) AS data,
                   COALESCE(type, '') AS kind,
                   COALESCE(attempts, 0) AS attempts,
                   sent_at, error_message
            FROM notification_queue
            WHERE status = $1
            ORDER BY created_at ASC
            LIMIT $2
            "#,
        )
        .bind(JobStatus::Pending)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(jobs)
    }

    async fn mark_sent(&self, id: Uuid, sent_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE notification_queue
            SET status = $2, sent_at = $3, error_message = NULL
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(JobStatus::Sent)
        .bind(sent_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_failed(
        &self,
        id: Uuid,
        attempts: i32,
        error_message: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE notification_queue
            SET status = $2, attempts = $3, error_message = $4
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(JobStatus::Failed)
        .bind(attempts)
        .bind(error_message)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
