//! PushCourier server binary entrypoint.
//!
//! Wires the queue store, the push delivery client, and the processor
//! together, spawns the interval scheduler, and serves the HTTP surface.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use courier_common::config::AppConfig;
use courier_common::db::create_pool;
use courier_engine::delivery::FcmClient;
use courier_engine::processor::QueueProcessor;
use courier_engine::scheduler::CycleScheduler;
use courier_engine::store::PgQueueStore;

use courier_server::routes::create_router;
use courier_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("courier_server=info,courier_engine=info,tower_http=info")
        }))
        .init();

    tracing::info!("Starting PushCourier server...");

    // Missing required configuration is fatal: exit non-zero before any
    // core logic runs.
    let config = AppConfig::from_env()?;

    // Create database connection pool and apply migrations
    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Long-lived collaborators, constructed once and injected by Arc
    let store = Arc::new(PgQueueStore::new(pool));
    let delivery = Arc::new(FcmClient::new(&config));
    let processor = Arc::new(QueueProcessor::new(store, delivery, config.queue_batch_size));

    // Interval scheduler shares the processor (and its cycle gate) with
    // the manual trigger endpoint
    let scheduler = CycleScheduler::new(processor.clone(), config.queue_poll_interval_ms);
    tokio::spawn(scheduler.run());

    // Build router
    let state = AppState::new(processor);
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("PushCourier server stopped.");
    Ok(())
}

/// Best-effort shutdown: stop accepting work on Ctrl+C; an in-flight cycle
/// is dropped with the scheduler task, not awaited.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Received shutdown signal, stopping gracefully...");
}
