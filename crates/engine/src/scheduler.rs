//! Fixed-interval scheduler that drives the queue processor.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;

use crate::processor::{CycleOutcome, QueueProcessor};

/// Invokes the processor on a fixed interval (default 2 s).
///
/// The processor's own gate serializes cycles, so a tick that fires while
/// the manual trigger (or a slow previous tick) is still processing simply
/// skips instead of double-fetching the same pending jobs.
pub struct CycleScheduler {
    processor: Arc<QueueProcessor>,
    interval: Duration,
}

impl CycleScheduler {
    pub fn new(processor: Arc<QueueProcessor>, poll_interval_ms: u64) -> Self {
        Self {
            processor,
            interval: Duration::from_millis(poll_interval_ms),
        }
    }

    /// Run the polling loop. Never returns; the binary spawns this as a
    /// task and drops it on shutdown without awaiting an in-flight cycle.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            poll_interval_ms = self.interval.as_millis() as u64,
            "queue polling started"
        );

        loop {
            ticker.tick().await;

            match self.processor.try_run_cycle().await {
                Ok(CycleOutcome::Completed(report)) if report.fetched > 0 => {
                    tracing::info!(
                        fetched = report.fetched,
                        sent = report.sent,
                        failed = report.failed,
                        "scheduled cycle complete"
                    );
                }
                Ok(CycleOutcome::Completed(_)) => {}
                Ok(CycleOutcome::Skipped) => {
                    tracing::debug!("previous cycle still running, tick skipped");
                }
                Err(e) => {
                    // Fetch errors are transient; the next tick retries.
                    tracing::error!(error = %e, "scheduled cycle failed");
                }
            }
        }
    }
}
