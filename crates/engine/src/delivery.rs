//! Push delivery client: translates a queued job into a provider request
//! and sends it over the FCM HTTP API.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use courier_common::config::AppConfig;
use courier_common::types::NotificationJob;

/// Android notification channel profile selected from the job's category
/// tag. `"chat"` maps to the chat channel, every other tag to the general
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationChannel {
    Chat,
    General,
}

impl NotificationChannel {
    pub fn for_kind(kind: &str) -> Self {
        if kind == "chat" {
            NotificationChannel::Chat
        } else {
            NotificationChannel::General
        }
    }

    /// Stable channel id the client app registered with the OS.
    pub fn channel_id(self) -> &'static str {
        match self {
            NotificationChannel::Chat => "courier_chat",
            NotificationChannel::General => "courier_general",
        }
    }
}

/// One delivery request, assembled from a queued job.
#[derive(Debug, Clone, PartialEq)]
pub struct PushMessage {
    pub token: String,
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
    pub channel: NotificationChannel,
}

impl PushMessage {
    pub fn from_job(job: &NotificationJob) -> Self {
        Self {
            token: job.recipient_token.clone(),
            title: job.title.clone(),
            body: job.body.clone(),
            data: job.data.0.clone(),
            channel: NotificationChannel::for_kind(&job.kind),
        }
    }
}

/// Errors raised while pushing one message to the provider.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("push request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("push provider returned HTTP {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("push rejected: {0}")]
    Rejected(String),
}

/// Delivery operations consumed by the queue processor.
#[async_trait]
pub trait PushDelivery: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<(), DeliveryError>;
}

/// FCM client over the legacy HTTP send endpoint.
pub struct FcmClient {
    http: reqwest::Client,
    api_url: String,
    server_key: String,
}

impl FcmClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: config.fcm_api_url.clone(),
            server_key: config.fcm_server_key.clone(),
        }
    }
}

/// Body of an FCM send response; only the fields the worker inspects.
#[derive(Debug, Deserialize)]
struct FcmResponse {
    #[serde(default)]
    failure: u32,
    #[serde(default)]
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    error: Option<String>,
}

fn fcm_payload(message: &PushMessage) -> serde_json::Value {
    json!({
        "to": message.token,
        "priority": "high",
        "notification": {
            "title": message.title,
            "body": message.body,
            "sound": "default",
            "android_channel_id": message.channel.channel_id(),
            "click_action": "FLUTTER_NOTIFICATION_CLICK",
        },
        "data": message.data,
    })
}

#[async_trait]
impl PushDelivery for FcmClient {
    async fn send(&self, message: &PushMessage) -> Result<(), DeliveryError> {
        let response = self
            .http
            .post(&self.api_url)
            .header(
                header::AUTHORIZATION,
                format!("key={}", self.server_key),
            )
            .json(&fcm_payload(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        // A 200 can still carry a per-token failure in the body.
        let body: FcmResponse = response.json().await?;
        if body.failure > 0 {
            let reason = body
                .results
                .into_iter()
                .find_map(|r| r.error)
                .unwrap_or_else(|| "unknown provider error".to_string());
            return Err(DeliveryError::Rejected(reason));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use courier_common::types::JobStatus;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn make_job(kind: &str) -> NotificationJob {
        NotificationJob {
            id: Uuid::new_v4(),
            status: JobStatus::Pending,
            created_at: Utc::now(),
            recipient_token: "device-token-1".to_string(),
            title: "New message".to_string(),
            body: "You have a new message".to_string(),
            data: Json(HashMap::from([(
                "conversation_id".to_string(),
                "42".to_string(),
            )])),
            kind: kind.to_string(),
            attempts: 0,
            sent_at: None,
            error_message: None,
        }
    }

    #[test]
    fn chat_kind_selects_chat_channel() {
        assert_eq!(
            NotificationChannel::for_kind("chat"),
            NotificationChannel::Chat
        );
    }

    #[test]
    fn any_other_kind_selects_general_channel() {
        assert_eq!(
            NotificationChannel::for_kind("ride"),
            NotificationChannel::General
        );
        assert_eq!(
            NotificationChannel::for_kind(""),
            NotificationChannel::General
        );
    }

    #[test]
    fn message_is_built_from_job_fields() {
        let job = make_job("chat");
        let message = PushMessage::from_job(&job);
        assert_eq!(message.token, "device-token-1");
        assert_eq!(message.title, "New message");
        assert_eq!(message.channel, NotificationChannel::Chat);
        assert_eq!(message.data.get("conversation_id").unwrap(), "42");
    }

    #[test]
    fn payload_carries_channel_and_data() {
        let message = PushMessage::from_job(&make_job("chat"));
        let payload = fcm_payload(&message);

        assert_eq!(payload["to"], "device-token-1");
        assert_eq!(payload["priority"], "high");
        assert_eq!(
            payload["notification"]["android_channel_id"],
            "courier_chat"
        );
        assert_eq!(payload["notification"]["sound"], "default");
        assert_eq!(payload["data"]["conversation_id"], "42");
    }

    #[test]
    fn provider_body_failure_is_detected() {
        let body: FcmResponse = serde_json::from_str(
            r#"{"multicast_id":1,"success":0,"failure":1,"results":[{"error":"InvalidRegistration"}]}"#,
        )
        .unwrap();
        assert_eq!(body.failure, 1);
        assert_eq!(
            body.results.into_iter().find_map(|r| r.error).as_deref(),
            Some("InvalidRegistration")
        );
    }

    #[test]
    fn provider_body_success_has_no_error() {
        let body: FcmResponse = serde_json::from_str(
            r#"{"multicast_id":1,"success":1,"failure":0,"results":[{"message_id":"m1"}]}"#,
        )
        .unwrap();
        assert_eq!(body.failure, 0);
    }
}
