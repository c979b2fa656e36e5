// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `JobStore`: durable storage for jobs, sims, idempotency keys, counters.
//!
//! Kept as a trait (per the teacher's factory-pattern convention — see
//! DESIGN.md) so a transactional document store or an embedded relational
//! store can stand in for [`MemoryJobStore`] without the `engine` crate
//! changing. Every conditional-update operation here must map to the
//! backing store's native CAS or transaction primitive; `MemoryJobStore`
//! maps it to a single `parking_lot::Mutex` critical section.

use crate::error::Result;
use sb_core::{Job, JobConfig, JobId, JobPatch, JobStatus, SimState, Simulation, SimulationPatch};

/// Outcome of `recoverStaleJob`: which sims were transitioned and whether
/// the job itself was failed out for exceeding its retry budget.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryOutcome {
    /// Indices of sims transitioned `RUNNING -> FAILED` for being stale.
    pub newly_failed_indices: Vec<u32>,
    /// Indices of sims that should be republished to the task bus
    /// (currently `PENDING`, plus any just transitioned to `FAILED`).
    pub republish_indices: Vec<u32>,
    /// Whether the job was transitioned to `FAILED` for exceeding
    /// `MAX_RETRIES`.
    pub job_failed: bool,
}

pub trait JobStore: Send + Sync {
    /// Atomic w.r.t. `idempotency_key`: returns the existing job if the key
    /// is already mapped, otherwise creates both the job (under `new_id`)
    /// and the key mapping in one critical section.
    fn create_job(&self, new_id: JobId, config: JobConfig, now_ms: u64) -> Result<Job>;

    /// Read-only lookup mirroring the key check inside `create_job`, so
    /// callers can detect an idempotent replay before doing anything that
    /// shouldn't be repeated on retry (e.g. debiting a rate limit).
    fn find_by_idempotency_key(&self, key: &str) -> Option<Job>;

    fn get_job(&self, job_id: &str) -> Option<Job>;

    fn list_jobs(&self) -> Vec<Job>;

    /// Jobs with `status in {QUEUED, RUNNING}`.
    fn list_active_jobs(&self) -> Vec<Job>;

    /// Creates `count` PENDING sim records, `index = 0..count`. Idempotent:
    /// a repeat call for the same count is a no-op.
    fn initialize_simulations(&self, job_id: &str, count: u32) -> Result<()>;

    fn get_simulations(&self, job_id: &str) -> Result<Vec<Simulation>>;

    fn get_simulation(&self, job_id: &str, sim_id: &str) -> Result<Simulation>;

    /// Unconditional update — used for non-terminal transitions only.
    fn update_simulation_status(
        &self,
        job_id: &str,
        sim_id: &str,
        patch: &SimulationPatch,
        now_ms: u64,
    ) -> Result<()>;

    /// Applies `patch` only if the sim's current state is in
    /// `allowed_from_states`. Returns `true` iff applied.
    fn conditional_update_simulation_status(
        &self,
        job_id: &str,
        sim_id: &str,
        allowed_from_states: &[SimState],
        patch: &SimulationPatch,
        now_ms: u64,
    ) -> Result<bool>;

    /// Atomic increment; returns post-increment `(completed, total)`.
    fn increment_completed_sim_count(&self, job_id: &str) -> Result<(u32, u32)>;

    /// No-op (returns `false`) unless the job's current status legally
    /// transitions to RUNNING.
    fn set_job_started_at(
        &self,
        job_id: &str,
        worker_id: &str,
        worker_name: &str,
        now_ms: u64,
    ) -> Result<bool>;

    fn set_job_completed(
        &self,
        job_id: &str,
        durations_ms: Option<Vec<u64>>,
        now_ms: u64,
    ) -> Result<bool>;

    fn set_job_failed(
        &self,
        job_id: &str,
        message: &str,
        durations_ms: Option<Vec<u64>>,
        now_ms: u64,
    ) -> Result<bool>;

    fn update_job_status(&self, job_id: &str, status: JobStatus) -> Result<bool>;

    /// Applies a worker-reported `JobPatch` (the `PATCH /jobs/{id}`
    /// surface). When `patch.status` is set, the transition is validated
    /// against `can_job_transition` and the whole patch is rejected (not
    /// applied) if it's illegal; otherwise every non-status field is
    /// written through unconditionally.
    fn apply_job_patch(&self, job_id: &str, patch: &JobPatch) -> Result<bool>;

    /// Sets job status to CANCELLED and all non-terminal sims to CANCELLED.
    fn cancel_job(&self, job_id: &str, now_ms: u64) -> Result<bool>;

    /// Atomically selects the oldest QUEUED job, flips it to RUNNING, and
    /// stamps `claimed_at_ms`.
    fn claim_next_job(&self, now_ms: u64) -> Result<Option<Job>>;

    /// Transitions stale RUNNING sims back to FAILED (for retry), bumps the
    /// job's retry count, and fails the job out if it exceeds `max_retries`.
    fn recover_stale_job(
        &self,
        job_id: &str,
        now_ms: u64,
        sim_stale_ms: u64,
        max_retries: u32,
    ) -> Result<RecoveryOutcome>;

    fn delete_job(&self, job_id: &str) -> Result<()>;

    fn delete_simulations(&self, job_id: &str) -> Result<()>;
}
