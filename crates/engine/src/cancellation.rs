// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CancellationService: user-initiated cancellation of a non-terminal job.
//!
//! Cancellation is fire-and-forget past the store write: the job and its
//! non-terminal sims flip to `CANCELLED` synchronously (so the caller's
//! response is accurate), while the worker push and partial aggregation
//! happen in the background. A scheduled recovery check for an
//! already-cancelled job is not actively torn down — `RecoveryService`'s
//! own terminal-job no-op (spec.md §4.7) makes that check a harmless
//! single read on its next fire, which is cheaper than a cancellation
//! token registry for an outcome that's already a no-op.

use std::sync::Arc;

use sb_core::{Caller, Clock};
use sb_storage::JobStore;
use serde::Serialize;
use tracing::instrument;

use crate::aggregator::Aggregator;
use crate::error::{EngineError, Result};
use crate::worker_registry::WorkerRegistry;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CancelJobResult {
    pub id: String,
    pub status: &'static str,
}

#[derive(Serialize)]
struct CancelPush<'a> {
    job_id: &'a str,
}

pub struct CancellationService<C: Clock> {
    store: Arc<dyn JobStore>,
    workers: Arc<WorkerRegistry>,
    aggregator: Arc<Aggregator<C>>,
    clock: C,
}

impl<C: Clock + 'static> CancellationService<C> {
    pub fn new(store: Arc<dyn JobStore>, workers: Arc<WorkerRegistry>, aggregator: Arc<Aggregator<C>>, clock: C) -> Self {
        Self { store, workers, aggregator, clock }
    }

    /// `POST /jobs/{id}/cancel`. A job already in a terminal status is a
    /// `Conflict`, not a no-op — per spec.md §8 property 8, the caller must
    /// be able to tell the difference between "I cancelled it" and "it was
    /// already done".
    #[instrument(skip(self, _caller), fields(job_id))]
    pub async fn cancel_job(&self, job_id: &str, _caller: &Caller) -> Result<CancelJobResult> {
        let job = self.store.get_job(job_id).ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))?;
        if job.is_terminal() {
            return Err(EngineError::Conflict(format!("job {job_id} is already {}", job.status)));
        }

        let now_ms = self.clock.epoch_ms();
        let applied = self.store.cancel_job(job_id, now_ms)?;
        if !applied {
            // Lost a race with a concurrent terminal transition between the
            // read above and the store's own state check.
            return Err(EngineError::Conflict(format!("job {job_id} is no longer cancellable")));
        }

        let workers = self.workers.clone();
        let push_job_id = job_id.to_string();
        tokio::spawn(async move {
            workers.push_to_all("/cancel", &CancelPush { job_id: &push_job_id }, now_ms).await;
        });

        // Any sims already terminal before the cancel still contribute
        // their rating data.
        self.aggregator.run(job_id).await;

        Ok(CancelJobResult { id: job_id.to_string(), status: "cancelled" })
    }
}

#[cfg(test)]
#[path = "cancellation_tests.rs"]
mod tests;
