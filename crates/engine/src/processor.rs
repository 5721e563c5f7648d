//! Queue processing cycle.
//!
//! One cycle fetches a bounded batch of pending jobs in creation order,
//! attempts delivery for each, and writes the resulting status back to the
//! store. Failures are isolated per job: one bad job never aborts the rest
//! of the batch, and only a fetch-stage error aborts a cycle.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use courier_common::error::AppError;
use courier_common::types::NotificationJob;

use crate::delivery::{PushDelivery, PushMessage};
use crate::store::QueueStore;

/// Summary of one completed cycle, logged and returned by the manual
/// trigger endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub fetched: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Result of asking the processor to run: either a cycle ran to completion
/// or another cycle was already in flight and this start was skipped.
#[derive(Debug)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Skipped,
}

/// Per-job result. Failures are values, never unwinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    Sent,
    Failed,
}

/// Orchestrates one polling cycle over the queue store and the push
/// delivery client.
///
/// Collaborators are injected once at startup and shared across cycles;
/// the processor itself keeps no state between cycles. The internal gate
/// serializes cycles: when the interval timer and the manual trigger
/// overlap, the late starter is skipped rather than racing the same
/// pending rows.
pub struct QueueProcessor {
    store: Arc<dyn QueueStore>,
    delivery: Arc<dyn PushDelivery>,
    batch_size: i64,
    gate: Mutex<()>,
}

impl QueueProcessor {
    pub fn new(
        store: Arc<dyn QueueStore>,
        delivery: Arc<dyn PushDelivery>,
        batch_size: i64,
    ) -> Self {
        Self {
            store,
            delivery,
            batch_size,
            gate: Mutex::new(()),
        }
    }

    /// Run one cycle unless another is already in flight.
    ///
    /// A fetch-stage error is cycle-scoped: it is returned to the caller
    /// (the scheduler logs it and retries on the next tick, the trigger
    /// endpoint surfaces it as HTTP 500) with no jobs touched.
    pub async fn try_run_cycle(&self) -> Result<CycleOutcome, AppError> {
        let Ok(_guard) = self.gate.try_lock() else {
            tracing::debug!("processing cycle already in flight, skipping this start");
            return Ok(CycleOutcome::Skipped);
        };

        let report = self.run_cycle().await?;
        Ok(CycleOutcome::Completed(report))
    }

    async fn run_cycle(&self) -> Result<CycleReport, AppError> {
        let jobs = match self.store.fetch_pending(self.batch_size).await {
            Ok(jobs) => jobs,
            Err(e) => {
                tracing::error!(error = %e, "queue fetch failed, aborting cycle");
                return Err(e);
            }
        };

        if jobs.is_empty() {
            tracing::debug!("no pending notifications");
            return Ok(CycleReport::default());
        }

        tracing::info!(count = jobs.len(), "processing pending notifications");

        let mut report = CycleReport {
            fetched: jobs.len(),
            ..CycleReport::default()
        };

        for job in &jobs {
            match self.process_job(job).await {
                JobOutcome::Sent => report.sent += 1,
                JobOutcome::Failed => report.failed += 1,
            }
        }

        tracing::info!(
            fetched = report.fetched,
            sent = report.sent,
            failed = report.failed,
            "cycle complete"
        );

        Ok(report)
    }

    /// Deliver one job and persist the outcome.
    ///
    /// A status-update failure after the send is logged only: the provider
    /// already accepted (or rejected) the message, and the local record
    /// catching up on a later attempt is an accepted inconsistency window.
    async fn process_job(&self, job: &NotificationJob) -> JobOutcome {
        let message = PushMessage::from_job(job);

        match self.delivery.send(&message).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, title = %job.title, "notification sent");
                if let Err(e) = self.store.mark_sent(job.id, Utc::now()).await {
                    tracing::error!(job_id = %job.id, error = %e, "failed to record sent status");
                }
                JobOutcome::Sent
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(job_id = %job.id, error = %reason, "push delivery failed");
                if let Err(e) = self
                    .store
                    .mark_failed(job.id, job.attempts + 1, &reason)
                    .await
                {
                    tracing::error!(job_id = %job.id, error = %e, "failed to record failed status");
                }
                JobOutcome::Failed
            }
        }
    }
}
