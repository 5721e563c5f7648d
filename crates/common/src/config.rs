use serde::Deserialize;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// FCM server key used to authorize push delivery requests
    pub fcm_server_key: String,

    /// FCM HTTP endpoint (default: the legacy send endpoint)
    pub fcm_api_url: String,

    /// HTTP listen port (default: 3000)
    pub port: u16,

    /// Queue polling interval in milliseconds (default: 2000)
    pub queue_poll_interval_ms: u64,

    /// Maximum number of pending jobs fetched per cycle (default: 10)
    pub queue_batch_size: i64,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// `DATABASE_URL` and `FCM_SERVER_KEY` are required; startup fails
    /// immediately when either is absent.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            fcm_server_key: std::env::var("FCM_SERVER_KEY")
                .map_err(|_| anyhow::anyhow!("FCM_SERVER_KEY environment variable is required"))?,
            fcm_api_url: std::env::var("FCM_API_URL")
                .unwrap_or_else(|_| "https://fcm.googleapis.com/fcm/send".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            queue_poll_interval_ms: std::env::var("QUEUE_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "2000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("QUEUE_POLL_INTERVAL_MS must be a valid u64"))?,
            queue_batch_size: std::env::var("QUEUE_BATCH_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("QUEUE_BATCH_SIZE must be a valid i64"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
        })
    }
}
