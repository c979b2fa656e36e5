// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! RecoveryService: detects stuck jobs, reruns aggregation, transitions
//! stale `RUNNING` sims back to `FAILED` for redelivery, and reschedules
//! itself while a job remains non-terminal.
//!
//! spec.md's dependency table lists `RecoveryService -> ... -> Scheduler`;
//! in this implementation the edge runs the other way (`Scheduler ->
//! RecoveryService`, to schedule a job's first check at create time) —
//! see DESIGN.md for why nothing in the §4.7 algorithm itself ever calls
//! back into `Scheduler`.

use std::sync::Arc;
use std::time::Duration;

use sb_core::{is_terminal_job, Clock, JobStatus};
use sb_storage::JobStore;
use tracing::{info, instrument, warn};

use crate::aggregator::Aggregator;
use crate::settings;
use crate::task_bus::TaskBus;

/// Outcome of one recovery check, returned verbatim by `POST
/// /jobs/{id}/recover`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryCheckResult {
    /// The job's status after the check ran.
    pub status: JobStatus,
    /// Whether this check took a recovery action (stuck-job aggregation
    /// dispatch, or a stale-sim/retry-budget transition). `None` when the
    /// job was already terminal and nothing ran.
    pub recovered: Option<bool>,
    /// Whether the job is still non-terminal after the check.
    pub still_active: Option<bool>,
}

struct Inner<C: Clock> {
    store: Arc<dyn JobStore>,
    aggregator: Arc<Aggregator<C>>,
    task_bus: Arc<dyn TaskBus>,
    clock: C,
}

/// Cheaply `Clone`-able so a scheduled check can own a handle to run
/// itself, and reschedule itself, from inside a detached `tokio` task.
pub struct RecoveryService<C: Clock> {
    inner: Arc<Inner<C>>,
}

impl<C: Clock> Clone for RecoveryService<C> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<C: Clock + 'static> RecoveryService<C> {
    pub fn new(store: Arc<dyn JobStore>, aggregator: Arc<Aggregator<C>>, task_bus: Arc<dyn TaskBus>, clock: C) -> Self {
        Self { inner: Arc::new(Inner { store, aggregator, task_bus, clock }) }
    }

    /// Spawns a detached task that sleeps `delay` then runs one recovery
    /// check for `job_id`. Used both for the first check scheduled at job
    /// creation and for every check's own rescheduling of the next one.
    pub fn schedule_check(&self, job_id: String, delay: Duration) {
        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.run_recovery_check(&job_id).await;
        });
    }

    /// `POST /recover/{jobId}` and the scheduled-check trigger both land
    /// here.
    #[instrument(skip(self), fields(job_id))]
    pub async fn run_recovery_check(&self, job_id: &str) -> RecoveryCheckResult {
        let Some(job) = self.inner.store.get_job(job_id) else {
            warn!(job_id, "recovery check for unknown job");
            return RecoveryCheckResult { status: JobStatus::Failed, recovered: None, still_active: None };
        };

        if is_terminal_job(job.status) {
            return RecoveryCheckResult { status: job.status, recovered: None, still_active: Some(false) };
        }

        let recovered = if job.is_stuck() {
            info!(job_id, "recovery found a stuck job, dispatching aggregation");
            self.inner.aggregator.run(job_id).await;
            true
        } else {
            self.recover_stale(job_id)
        };

        // Reschedule only while the job is still non-terminal; a terminal
        // transition (by this check or any concurrent one) quietly drops
        // the chain.
        let after = self.inner.store.get_job(job_id);
        let still_active = after.as_ref().map(|j| !is_terminal_job(j.status)).unwrap_or(false);
        if still_active {
            self.schedule_check(job_id.to_string(), settings::t_retry());
        }

        RecoveryCheckResult {
            status: after.map(|j| j.status).unwrap_or(job.status),
            recovered: Some(recovered),
            still_active: Some(still_active),
        }
    }

    /// Returns `true` iff this check transitioned any sim or failed the
    /// job out — i.e. took a visible recovery action.
    fn recover_stale(&self, job_id: &str) -> bool {
        let now_ms = self.inner.clock.epoch_ms();
        let outcome = match self.inner.store.recover_stale_job(
            job_id,
            now_ms,
            settings::t_sim_stale().as_millis() as u64,
            settings::max_retries(),
        ) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(job_id, error = %err, "recover_stale_job failed, will retry on next check");
                return false;
            }
        };

        if outcome.job_failed {
            info!(job_id, "job failed out: max retries exceeded");
            return true;
        }

        if outcome.republish_indices.is_empty() {
            return false;
        }

        let Some(job) = self.inner.store.get_job(job_id) else { return false };
        info!(
            job_id,
            count = outcome.republish_indices.len(),
            newly_failed = outcome.newly_failed_indices.len(),
            "republishing sim tasks after recovery"
        );
        self.inner.task_bus.publish_tasks_for_indices(job_id, &outcome.republish_indices, job.total_sim_count);
        !outcome.newly_failed_indices.is_empty()
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
