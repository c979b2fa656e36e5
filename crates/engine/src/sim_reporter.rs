// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SimReporter: receives sim state updates from workers, enforces the state
//! machine, and drives the job's completion counter.

use std::sync::Arc;

use sb_core::{can_sim_transition, is_terminal_sim, Caller, Clock, SimState, SimulationPatch};
use sb_storage::JobStore;
use serde::Serialize;
use tracing::instrument;

use crate::aggregator::Aggregator;
use crate::error::{EngineError, Result};
use crate::progress_bus::ProgressBus;

/// Result of `UpdateSim`, returned verbatim to the worker.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateSimOutcome {
    pub updated: bool,
    pub reason: Option<String>,
}

impl UpdateSimOutcome {
    fn applied() -> Self {
        Self { updated: true, reason: None }
    }

    fn rejected(reason: &str) -> Self {
        Self { updated: false, reason: Some(reason.to_string()) }
    }
}

pub struct SimReporter<C: Clock> {
    store: Arc<dyn JobStore>,
    progress: Arc<dyn ProgressBus>,
    aggregator: Arc<Aggregator<C>>,
    clock: C,
}

impl<C: Clock + 'static> SimReporter<C> {
    pub fn new(store: Arc<dyn JobStore>, progress: Arc<dyn ProgressBus>, aggregator: Arc<Aggregator<C>>, clock: C) -> Self {
        Self { store, progress, aggregator, clock }
    }

    #[instrument(skip(self, patch), fields(job_id, sim_id))]
    pub async fn update_sim(
        &self,
        job_id: &str,
        sim_id: &str,
        patch: SimulationPatch,
        caller: &Caller,
    ) -> Result<UpdateSimOutcome> {
        if !caller.is_worker() {
            return Err(EngineError::Forbidden("UpdateSim requires a worker caller".to_string()));
        }

        let current = self.store.get_simulation(job_id, sim_id)?;
        let now_ms = self.clock.epoch_ms();

        // Step 1: a sim already at a terminal state rejects every further
        // state-setting patch, including an exact repeat of the same
        // terminal value — this is what defeats redelivered stale messages.
        if is_terminal_sim(current.state) && patch.state.is_some() {
            return Ok(UpdateSimOutcome::rejected("terminal_state"));
        }

        // Step 2: validate the requested transition, if any.
        if let Some(requested) = patch.state {
            if !can_sim_transition(current.state, requested) {
                return Err(EngineError::Conflict(format!(
                    "illegal sim transition {}->{requested}",
                    current.state
                )));
            }
        }

        let outcome = if patch.state.is_some_and(is_terminal_sim) {
            // Step 4: terminal transitions are CAS'd against the set of
            // non-terminal source states; a lost race is an idempotent no-op.
            let applied = self.store.conditional_update_simulation_status(
                job_id,
                sim_id,
                &[SimState::Pending, SimState::Running, SimState::Failed],
                &patch,
                now_ms,
            )?;
            if !applied {
                return Ok(UpdateSimOutcome::rejected("terminal_state"));
            }
            UpdateSimOutcome::applied()
        } else {
            // Step 5: non-terminal transitions are unconditional.
            self.store.update_simulation_status(job_id, sim_id, &patch, now_ms)?;
            UpdateSimOutcome::applied()
        };

        // Step 6: auto-promote the parent job on first RUNNING.
        if patch.state == Some(SimState::Running) {
            if let Some(job) = self.store.get_job(job_id) {
                if job.status == sb_core::JobStatus::Queued {
                    let worker_id = patch.worker_id.as_deref().unwrap_or_default();
                    let worker_name = patch.worker_name.as_deref().unwrap_or_default();
                    self.store.set_job_started_at(job_id, worker_id, worker_name, now_ms)?;
                    self.store.update_job_status(job_id, sb_core::JobStatus::Running)?;
                }
            }
        }

        // Step 7: a successful terminal CAS advances the parent counter and,
        // on saturation, dispatches aggregation.
        if matches!(patch.state, Some(s) if is_terminal_sim(s)) && outcome.updated {
            let (completed, total) = self.store.increment_completed_sim_count(job_id)?;
            if completed >= total && total > 0 {
                let aggregator = self.aggregator.clone();
                let job_id = job_id.to_string();
                tokio::spawn(async move { aggregator.run(&job_id).await });
            }
        }

        // Step 8: stream the update to subscribers.
        if let Some(job) = self.store.get_job(job_id) {
            self.progress.publish_job(&job);
        }
        if let Ok(sims) = self.store.get_simulations(job_id) {
            self.progress.publish_sims(job_id, &sims);
        }

        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "sim_reporter_tests.rs"]
mod tests;
