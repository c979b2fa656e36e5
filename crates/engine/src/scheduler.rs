// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: creates jobs, fans sims out over the `TaskBus`, and computes
//! the effective status clients see.

use std::sync::Arc;

use sb_core::{
    can_job_transition, Caller, Clock, DeckSnapshot, Job, JobConfig, JobId, JobPatch, JobStatus,
    DECK_COUNT,
};
use sb_storage::JobStore;
use tracing::{info, instrument};

use crate::aggregator::Aggregator;
use crate::collaborators::DeckStore;
use crate::error::{EngineError, Result};
use crate::progress_bus::ProgressBus;
use crate::rate_limiter::RateLimiter;
use crate::recovery::RecoveryService;
use crate::settings;
use crate::task_bus::TaskBus;

/// Validated, wire-agnostic create-job request. The HTTP layer is
/// responsible for turning a JSON body into this (or a `BadRequest`).
#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    pub deck_ids: Vec<String>,
    pub requested_sims: u32,
    pub parallelism: Option<u32>,
    pub idempotency_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateJobResult {
    pub job_id: String,
    pub deck_names: Vec<String>,
}

pub struct Scheduler<C: Clock> {
    store: Arc<dyn JobStore>,
    task_bus: Arc<dyn TaskBus>,
    progress: Arc<dyn ProgressBus>,
    decks: Arc<dyn DeckStore>,
    aggregator: Arc<Aggregator<C>>,
    recovery: Arc<RecoveryService<C>>,
    rate_limiter: RateLimiter,
    clock: C,
}

impl<C: Clock + 'static> Scheduler<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn JobStore>,
        task_bus: Arc<dyn TaskBus>,
        progress: Arc<dyn ProgressBus>,
        decks: Arc<dyn DeckStore>,
        aggregator: Arc<Aggregator<C>>,
        recovery: Arc<RecoveryService<C>>,
        clock: C,
    ) -> Self {
        let rate_limiter =
            RateLimiter::new(settings::rate_limit_window().as_millis() as u64, settings::rate_limit_budget());
        Self { store, task_bus, progress, decks, aggregator, recovery, rate_limiter, clock }
    }

    /// `POST /jobs`. Every step after validation and the rate-limit check
    /// must be safe to repeat under retry: a job is durable before its
    /// fan-out is attempted, so a crash between persistence and publish is
    /// healed by `RecoveryService`, not by this call failing outright.
    #[instrument(skip(self, req, caller), fields(caller = %caller.id))]
    pub async fn create_job(&self, req: CreateJobRequest, caller: &Caller) -> Result<CreateJobResult> {
        if req.deck_ids.len() != DECK_COUNT {
            return Err(EngineError::BadRequest(format!(
                "deckIds must have exactly {DECK_COUNT} entries, got {}",
                req.deck_ids.len()
            )));
        }
        let sim_max = settings::sim_max();
        if req.requested_sims == 0 || req.requested_sims > sim_max {
            return Err(EngineError::BadRequest(format!(
                "simulations must be in [1,{sim_max}], got {}",
                req.requested_sims
            )));
        }
        let parallelism = req.parallelism.unwrap_or(1);
        let par_max = settings::par_max();
        if parallelism == 0 || parallelism > par_max {
            return Err(EngineError::BadRequest(format!(
                "parallelism must be in [1,{par_max}], got {parallelism}"
            )));
        }

        // A retry carrying a key that's already mapped must not debit the
        // rate limiter again: the store call below will just hand back the
        // existing job, so check the key first and skip straight to it.
        if let Some(key) = &req.idempotency_key {
            if let Some(existing) = self.store.find_by_idempotency_key(key) {
                let deck_names: Vec<String> = existing.deck_snapshot.iter().map(|d| d.name.clone()).collect();
                info!(job_id = %existing.id, "idempotent create: returning existing job");
                return Ok(CreateJobResult { job_id: existing.id.to_string(), deck_names });
            }
        }

        let now_ms = self.clock.epoch_ms();
        if !self.rate_limiter.try_acquire(&caller.id, req.requested_sims, now_ms) {
            return Err(EngineError::RateLimited);
        }

        let mut deck_snapshot: Vec<DeckSnapshot> = Vec::with_capacity(DECK_COUNT);
        for deck_id in &req.deck_ids {
            deck_snapshot.push(self.decks.resolve(deck_id).await?);
        }
        let deck_snapshot: [DeckSnapshot; DECK_COUNT] = deck_snapshot
            .try_into()
            .map_err(|_| EngineError::Internal("deck snapshot arity mismatch".to_string()))?;
        let deck_ids: [String; DECK_COUNT] = req
            .deck_ids
            .clone()
            .try_into()
            .map_err(|_| EngineError::Internal("deck id arity mismatch".to_string()))?;

        let config = JobConfig {
            deck_ids,
            deck_snapshot,
            requested_sims: req.requested_sims,
            games_per_container: settings::games_per_container(),
            idempotency_key: req.idempotency_key,
            created_by: caller.id.clone(),
        };

        // A fresh `JobId` is minted before the call so idempotent replays
        // are detectable without changing `JobStore::create_job`'s
        // signature: the store only ever returns an id other than the one
        // we pass in when an existing job already owns the idempotency key.
        let candidate_id = JobId::new();
        let job = self.store.create_job(candidate_id.clone(), config, now_ms)?;
        let deck_names: Vec<String> = job.deck_snapshot.iter().map(|d| d.name.clone()).collect();

        if job.id == candidate_id {
            self.store.initialize_simulations(job.id.as_str(), job.total_sim_count)?;
            self.task_bus.publish_simulation_tasks(job.id.as_str(), job.total_sim_count);
            self.recovery.schedule_check(job.id.to_string(), settings::t_recovery());
            self.progress.publish_job(&job);
            info!(job_id = %job.id, total_sims = job.total_sim_count, "job created and fanned out");
        } else {
            info!(job_id = %job.id, "idempotent create: returning existing job");
        }

        Ok(CreateJobResult { job_id: job.id.to_string(), deck_names })
    }

    /// `GET /jobs`: every returned job's status has already been run
    /// through [`Self::effective_status`], which may dispatch a background
    /// aggregation as a side effect.
    pub fn list_jobs(&self) -> Vec<(Job, JobStatus)> {
        self.store.list_jobs().into_iter().map(|job| self.with_effective_status(job)).collect()
    }

    pub fn get_job(&self, job_id: &str) -> Option<(Job, JobStatus)> {
        self.store.get_job(job_id).map(|job| self.with_effective_status(job))
    }

    fn with_effective_status(&self, job: Job) -> (Job, JobStatus) {
        let status = self.effective_status(&job);
        (job, status)
    }

    /// A `RUNNING` job whose counter has saturated is presented as
    /// `COMPLETED` to clients, shielding them from aggregation lag (see
    /// spec.md's "stuck job" glossary entry). Firing this derivation
    /// dispatches a background aggregation — deduplicated by
    /// `Aggregator`'s own inflight set, so calling this repeatedly for the
    /// same job is cheap.
    pub fn effective_status(&self, job: &Job) -> JobStatus {
        if job.is_stuck() {
            let aggregator = self.aggregator.clone();
            let job_id = job.id.to_string();
            tokio::spawn(async move { aggregator.run(&job_id).await });
            JobStatus::Completed
        } else {
            job.status
        }
    }

    /// `GET /jobs/next`: pull-mode workers atomically claim the oldest
    /// `QUEUED` job. Returns `None` for the `204` case.
    pub fn claim_next_job(&self, caller: &Caller) -> Result<Option<Job>> {
        if !caller.is_worker() {
            return Err(EngineError::Forbidden("GET /jobs/next requires a worker caller".to_string()));
        }
        let now_ms = self.clock.epoch_ms();
        Ok(self.store.claim_next_job(now_ms)?)
    }

    /// `PATCH /jobs/{id}`: a worker-reported job-level status update,
    /// distinct from the per-sim reporting `SimReporter` handles. The
    /// requested status (if any) is validated against `can_job_transition`
    /// before any field is written.
    pub fn patch_job(&self, job_id: &str, patch: JobPatch, caller: &Caller) -> Result<Job> {
        if !caller.is_worker() {
            return Err(EngineError::Forbidden("PATCH /jobs/{id} requires a worker caller".to_string()));
        }
        let current = self.store.get_job(job_id).ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))?;
        if let Some(status) = patch.status {
            if !can_job_transition(current.status, status) {
                return Err(EngineError::Conflict(format!("illegal job transition {}->{status}", current.status)));
            }
        }
        let applied = self.store.apply_job_patch(job_id, &patch)?;
        if !applied {
            // Lost a race with a concurrent terminal transition between the
            // read above and the store's own state check.
            return Err(EngineError::Conflict(format!("job {job_id} changed concurrently")));
        }
        let job = self.store.get_job(job_id).ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))?;
        self.progress.publish_job(&job);
        Ok(job)
    }

    /// `DELETE /jobs/{id}`, admin-only.
    pub fn delete_job(&self, job_id: &str, caller: &Caller) -> Result<()> {
        if !caller.is_admin() {
            return Err(EngineError::Forbidden("DELETE /jobs/{id} requires an admin caller".to_string()));
        }
        self.store.delete_job(job_id)?;
        self.store.delete_simulations(job_id)?;
        Ok(())
    }

    /// `POST /jobs/bulk-delete`, admin-only. Per-id failures are collected
    /// rather than aborting the whole batch.
    pub fn bulk_delete_jobs(&self, job_ids: &[String], caller: &Caller) -> Result<Vec<(String, bool)>> {
        if !caller.is_admin() {
            return Err(EngineError::Forbidden("POST /jobs/bulk-delete requires an admin caller".to_string()));
        }
        Ok(job_ids
            .iter()
            .map(|id| {
                let ok = self.store.delete_job(id).is_ok();
                if ok {
                    let _ = self.store.delete_simulations(id);
                }
                (id.clone(), ok)
            })
            .collect())
    }

    /// `POST /jobs/{id}/simulations`, worker-only. Mirrors `create_job`'s own
    /// fan-out step: `JobStore::initialize_simulations` is idempotent for
    /// indices that already exist, so only the newly created tail is
    /// published to the `TaskBus`.
    pub fn init_simulations(&self, job_id: &str, count: u32, caller: &Caller) -> Result<u32> {
        if !caller.is_worker() {
            return Err(EngineError::Forbidden("POST /jobs/{id}/simulations requires a worker caller".to_string()));
        }
        let existing = self.store.get_simulations(job_id)?.len() as u32;
        self.store.initialize_simulations(job_id, count)?;
        let new_indices: Vec<u32> = (existing..count).collect();
        if !new_indices.is_empty() {
            self.task_bus.publish_tasks_for_indices(job_id, &new_indices, count);
        }
        Ok(new_indices.len() as u32)
    }

    /// `GET /jobs/{id}/simulations`.
    pub fn list_simulations(&self, job_id: &str) -> Result<Vec<sb_core::Simulation>> {
        Ok(self.store.get_simulations(job_id)?)
    }

    /// `GET /workers`'s `queueDepth` field.
    pub fn queue_depth(&self) -> usize {
        self.task_bus.queue_depth()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
