// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory `JobStore`, guarded by a single `parking_lot::Mutex`.
//!
//! Every public method takes the lock for the span of one logical
//! operation — that critical section is this store's stand-in for the
//! CAS/transaction primitive a networked store would use natively.

use std::collections::HashMap;

use parking_lot::Mutex;
use sb_core::{
    can_job_transition, can_sim_transition, is_terminal_sim, Job, JobConfig, JobId, JobPatch,
    JobStatus, SimState, Simulation, SimulationPatch,
};

use crate::error::{Error, Result};
use crate::job_store::{JobStore, RecoveryOutcome};

#[derive(Default)]
struct State {
    jobs: HashMap<String, Job>,
    sims: HashMap<String, Vec<Simulation>>,
    idempotency: HashMap<String, String>,
}

/// Single-process, in-memory `JobStore`. Data does not survive a restart —
/// see DESIGN.md for why that's an acceptable default implementation here.
#[derive(Default)]
pub struct MemoryJobStore {
    state: Mutex<State>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sim_index(sims: &[Simulation], sim_id_str: &str) -> Option<usize> {
    sims.iter().position(|s| s.sim_id() == sim_id_str)
}

impl JobStore for MemoryJobStore {
    fn create_job(&self, new_id: JobId, config: JobConfig, now_ms: u64) -> Result<Job> {
        let mut state = self.state.lock();

        if let Some(key) = &config.idempotency_key {
            if let Some(existing_id) = state.idempotency.get(key) {
                return state
                    .jobs
                    .get(existing_id)
                    .cloned()
                    .ok_or_else(|| Error::JobNotFound(existing_id.clone()));
            }
        }

        let job = Job::new(new_id.clone(), config, now_ms);
        if let Some(key) = &job.idempotency_key {
            state.idempotency.insert(key.clone(), new_id.to_string());
        }
        state.jobs.insert(new_id.to_string(), job.clone());
        Ok(job)
    }

    fn find_by_idempotency_key(&self, key: &str) -> Option<Job> {
        let state = self.state.lock();
        let existing_id = state.idempotency.get(key)?;
        state.jobs.get(existing_id).cloned()
    }

    fn get_job(&self, job_id: &str) -> Option<Job> {
        self.state.lock().jobs.get(job_id).cloned()
    }

    fn list_jobs(&self) -> Vec<Job> {
        self.state.lock().jobs.values().cloned().collect()
    }

    fn list_active_jobs(&self) -> Vec<Job> {
        self.state
            .lock()
            .jobs
            .values()
            .filter(|j| matches!(j.status, JobStatus::Queued | JobStatus::Running))
            .cloned()
            .collect()
    }

    fn initialize_simulations(&self, job_id: &str, count: u32) -> Result<()> {
        let mut state = self.state.lock();
        if !state.jobs.contains_key(job_id) {
            return Err(Error::JobNotFound(job_id.to_string()));
        }
        let job_id_typed: JobId = job_id.to_string().into();
        let sims = state.sims.entry(job_id.to_string()).or_default();
        let existing = sims.len() as u32;
        for index in existing..count {
            sims.push(Simulation::new_pending(job_id_typed.clone(), index));
        }
        Ok(())
    }

    fn get_simulations(&self, job_id: &str) -> Result<Vec<Simulation>> {
        let state = self.state.lock();
        state
            .sims
            .get(job_id)
            .cloned()
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))
    }

    fn get_simulation(&self, job_id: &str, sim_id_str: &str) -> Result<Simulation> {
        let state = self.state.lock();
        let sims = state
            .sims
            .get(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        sim_index(sims, sim_id_str)
            .map(|i| sims[i].clone())
            .ok_or_else(|| Error::SimNotFound {
                job_id: job_id.to_string(),
                sim_id: sim_id_str.to_string(),
            })
    }

    fn update_simulation_status(
        &self,
        job_id: &str,
        sim_id_str: &str,
        patch: &SimulationPatch,
        now_ms: u64,
    ) -> Result<()> {
        let mut state = self.state.lock();
        let sims = state
            .sims
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        let idx = sim_index(sims, sim_id_str).ok_or_else(|| Error::SimNotFound {
            job_id: job_id.to_string(),
            sim_id: sim_id_str.to_string(),
        })?;
        apply_sim_patch(&mut sims[idx], patch, now_ms);
        Ok(())
    }

    fn conditional_update_simulation_status(
        &self,
        job_id: &str,
        sim_id_str: &str,
        allowed_from_states: &[SimState],
        patch: &SimulationPatch,
        now_ms: u64,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let sims = state
            .sims
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        let idx = sim_index(sims, sim_id_str).ok_or_else(|| Error::SimNotFound {
            job_id: job_id.to_string(),
            sim_id: sim_id_str.to_string(),
        })?;
        let sim = &mut sims[idx];
        if !allowed_from_states.contains(&sim.state) {
            return Ok(false);
        }
        if let Some(to) = patch.state {
            if !can_sim_transition(sim.state, to) {
                return Ok(false);
            }
        }
        apply_sim_patch(sim, patch, now_ms);
        Ok(true)
    }

    fn increment_completed_sim_count(&self, job_id: &str) -> Result<(u32, u32)> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        job.completed_sim_count += 1;
        Ok((job.completed_sim_count, job.total_sim_count))
    }

    fn set_job_started_at(
        &self,
        job_id: &str,
        worker_id: &str,
        worker_name: &str,
        now_ms: u64,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        if !can_job_transition(job.status, JobStatus::Running) {
            return Ok(false);
        }
        job.status = JobStatus::Running;
        job.started_at_ms.get_or_insert(now_ms);
        job.worker_id = Some(worker_id.to_string());
        job.worker_name = Some(worker_name.to_string());
        Ok(true)
    }

    fn set_job_completed(
        &self,
        job_id: &str,
        durations_ms: Option<Vec<u64>>,
        now_ms: u64,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        if !can_job_transition(job.status, JobStatus::Completed) {
            return Ok(false);
        }
        job.status = JobStatus::Completed;
        job.completed_at_ms = Some(now_ms);
        if let Some(durations) = durations_ms {
            job.container_durations_ms = durations;
        }
        Ok(true)
    }

    fn set_job_failed(
        &self,
        job_id: &str,
        message: &str,
        durations_ms: Option<Vec<u64>>,
        now_ms: u64,
    ) -> Result<bool> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        if !can_job_transition(job.status, JobStatus::Failed) {
            return Ok(false);
        }
        job.status = JobStatus::Failed;
        job.completed_at_ms = Some(now_ms);
        job.error_message = Some(message.to_string());
        if let Some(durations) = durations_ms {
            job.container_durations_ms = durations;
        }
        Ok(true)
    }

    fn update_job_status(&self, job_id: &str, status: JobStatus) -> Result<bool> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        if !can_job_transition(job.status, status) {
            return Ok(false);
        }
        job.status = status;
        Ok(true)
    }

    fn apply_job_patch(&self, job_id: &str, patch: &JobPatch) -> Result<bool> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        if let Some(status) = patch.status {
            if !can_job_transition(job.status, status) {
                return Ok(false);
            }
        }
        job.apply_patch(patch);
        Ok(true)
    }

    fn cancel_job(&self, job_id: &str, now_ms: u64) -> Result<bool> {
        let mut state = self.state.lock();
        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        if !can_job_transition(job.status, JobStatus::Cancelled) {
            return Ok(false);
        }
        job.status = JobStatus::Cancelled;
        job.completed_at_ms = Some(now_ms);
        if let Some(sims) = state.sims.get_mut(job_id) {
            for sim in sims.iter_mut() {
                if !is_terminal_sim(sim.state) && can_sim_transition(sim.state, SimState::Cancelled)
                {
                    sim.state = SimState::Cancelled;
                    sim.completed_at_ms = Some(now_ms);
                }
            }
        }
        Ok(true)
    }

    fn claim_next_job(&self, now_ms: u64) -> Result<Option<Job>> {
        let mut state = self.state.lock();
        let Some(job) = state
            .jobs
            .values_mut()
            .filter(|j| j.status == JobStatus::Queued)
            .min_by_key(|j| j.created_at_ms)
        else {
            return Ok(None);
        };
        job.status = JobStatus::Running;
        job.claimed_at_ms = Some(now_ms);
        Ok(Some(job.clone()))
    }

    fn recover_stale_job(
        &self,
        job_id: &str,
        now_ms: u64,
        sim_stale_ms: u64,
        max_retries: u32,
    ) -> Result<RecoveryOutcome> {
        let mut state = self.state.lock();
        let mut outcome = RecoveryOutcome::default();

        let sims = state.sims.get_mut(job_id);
        let mut bumped_retries = 0u32;
        if let Some(sims) = sims {
            for sim in sims.iter_mut() {
                match sim.state {
                    SimState::Running => {
                        let started = sim.started_at_ms.unwrap_or(now_ms);
                        if now_ms.saturating_sub(started) >= sim_stale_ms {
                            sim.state = SimState::Failed;
                            sim.completed_at_ms = Some(now_ms);
                            sim.error_message = Some("stale: no heartbeat within threshold".into());
                            outcome.newly_failed_indices.push(sim.index);
                            outcome.republish_indices.push(sim.index);
                            bumped_retries += 1;
                        }
                    }
                    SimState::Pending => {
                        outcome.republish_indices.push(sim.index);
                    }
                    _ => {}
                }
            }
        }

        if bumped_retries == 0 {
            return Ok(outcome);
        }

        let job = state
            .jobs
            .get_mut(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        job.retry_count += bumped_retries;

        if job.retry_count > max_retries {
            if can_job_transition(job.status, JobStatus::Failed) {
                job.status = JobStatus::Failed;
                job.completed_at_ms = Some(now_ms);
                job.error_message = Some("max retries exceeded".to_string());
            }
            outcome.job_failed = true;
            outcome.republish_indices.clear();
        }

        Ok(outcome)
    }

    fn delete_job(&self, job_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state
            .jobs
            .remove(job_id)
            .ok_or_else(|| Error::JobNotFound(job_id.to_string()))?;
        state.sims.remove(job_id);
        state.idempotency.retain(|_, v| v != job_id);
        Ok(())
    }

    fn delete_simulations(&self, job_id: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.sims.remove(job_id);
        Ok(())
    }
}

fn apply_sim_patch(sim: &mut Simulation, patch: &SimulationPatch, now_ms: u64) {
    let entering_running = patch.state == Some(SimState::Running) && sim.state != SimState::Running;
    let entering_terminal = matches!(patch.state, Some(s) if is_terminal_sim(s));
    sim.apply_patch(patch);
    if entering_running {
        sim.started_at_ms.get_or_insert(now_ms);
    }
    if entering_terminal {
        sim.completed_at_ms = Some(now_ms);
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
