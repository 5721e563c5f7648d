use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// Delivery status of a queued notification.
///
/// `Pending` is the initial state; `Sent` and `Failed` are terminal for a
/// given attempt. A failed job stays failed until an external producer
/// re-enqueues it — this system never retries on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Sent,
    Failed,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Sent => write!(f, "sent"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One row of the `notification_queue` table: a single push notification
/// waiting to be delivered.
///
/// Optional columns carry documented defaults that the store applies at
/// read time, so processing logic never sees a missing value:
/// `data` defaults to an empty map, `kind` (column `type`) to the empty
/// string, and `attempts` to 0.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationJob {
    pub id: Uuid,
    pub status: JobStatus,
    /// FIFO ordering key; jobs are processed oldest first.
    pub created_at: DateTime<Utc>,
    /// Opaque device token understood by the push provider.
    pub recipient_token: String,
    pub title: String,
    pub body: String,
    /// Extra key/value payload forwarded verbatim to the provider.
    pub data: Json<HashMap<String, String>>,
    /// Category tag; `"chat"` selects the chat channel profile, anything
    /// else the general one.
    pub kind: String,
    /// Count of failed delivery attempts so far; only ever increases.
    pub attempts: i32,
    /// Set exactly when the job reached the provider successfully.
    pub sent_at: Option<DateTime<Utc>>,
    /// Reason of the most recent failed attempt; cleared on success.
    pub error_message: Option<String>,
}
