// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sb_core::test_support::test_job_config;
use sb_core::{JobId, JobPatch, JobStatus, SimState, SimulationPatch};

use super::MemoryJobStore;
use crate::job_store::JobStore;

fn store() -> MemoryJobStore {
    MemoryJobStore::new()
}

#[test]
fn create_job_with_idempotency_key_is_idempotent() {
    let store = store();
    let mut config = test_job_config(16);
    config.idempotency_key = Some("client-key-1".to_string());

    let first = store
        .create_job(JobId::new(), config.clone(), 1_000)
        .unwrap();
    let second = store.create_job(JobId::new(), config, 2_000).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(store.list_jobs().len(), 1);
}

#[test]
fn create_job_without_idempotency_key_always_creates_new() {
    let store = store();
    let config = test_job_config(16);

    let a = store.create_job(JobId::new(), config.clone(), 1_000).unwrap();
    let b = store.create_job(JobId::new(), config, 1_000).unwrap();

    assert_ne!(a.id, b.id);
    assert_eq!(store.list_jobs().len(), 2);
}

#[test]
fn initialize_simulations_is_idempotent() {
    let store = store();
    let job = store
        .create_job(JobId::new(), test_job_config(16), 0)
        .unwrap();

    store.initialize_simulations(job.id.as_str(), 4).unwrap();
    store.initialize_simulations(job.id.as_str(), 4).unwrap();

    assert_eq!(store.get_simulations(job.id.as_str()).unwrap().len(), 4);
}

#[test]
fn claim_next_job_picks_oldest_queued() {
    let store = store();
    let late = store.create_job(JobId::new(), test_job_config(4), 5_000).unwrap();
    let early = store.create_job(JobId::new(), test_job_config(4), 1_000).unwrap();

    let claimed = store.claim_next_job(9_000).unwrap().expect("a queued job exists");

    assert_eq!(claimed.id, early.id);
    assert_eq!(claimed.status, JobStatus::Running);
    assert_eq!(claimed.claimed_at_ms, Some(9_000));

    // The later job is still queued and untouched.
    let late_reloaded = store.get_job(late.id.as_str()).unwrap();
    assert_eq!(late_reloaded.status, JobStatus::Queued);
}

#[test]
fn claim_next_job_returns_none_when_nothing_queued() {
    let store = store();
    assert!(store.claim_next_job(1_000).unwrap().is_none());
}

#[test]
fn conditional_update_rejects_double_terminal_transition() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(4), 0).unwrap();
    store.initialize_simulations(job.id.as_str(), 1).unwrap();

    let running_patch = SimulationPatch {
        state: Some(SimState::Running),
        worker_id: Some("w-1".to_string()),
        worker_name: Some("worker-one".to_string()),
        ..Default::default()
    };
    let applied = store
        .conditional_update_simulation_status(
            job.id.as_str(),
            "sim_000",
            &[SimState::Pending],
            &running_patch,
            10,
        )
        .unwrap();
    assert!(applied);

    let complete_patch = SimulationPatch { state: Some(SimState::Completed), ..Default::default() };
    let first_complete = store
        .conditional_update_simulation_status(
            job.id.as_str(),
            "sim_000",
            &[SimState::Running],
            &complete_patch,
            20,
        )
        .unwrap();
    assert!(first_complete);

    // A second attempt to complete an already-terminal sim is a no-op, not an error.
    let second_complete = store
        .conditional_update_simulation_status(
            job.id.as_str(),
            "sim_000",
            &[SimState::Running],
            &complete_patch,
            30,
        )
        .unwrap();
    assert!(!second_complete);

    let sim = store.get_simulation(job.id.as_str(), "sim_000").unwrap();
    assert_eq!(sim.state, SimState::Completed);
    assert_eq!(sim.completed_at_ms, Some(20));
}

#[test]
fn recover_stale_job_fails_running_sim_and_requests_republish() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(4), 0).unwrap();
    store.initialize_simulations(job.id.as_str(), 1).unwrap();

    let running_patch = SimulationPatch {
        state: Some(SimState::Running),
        worker_id: Some("w-1".to_string()),
        worker_name: Some("worker-one".to_string()),
        ..Default::default()
    };
    store
        .conditional_update_simulation_status(
            job.id.as_str(),
            "sim_000",
            &[SimState::Pending],
            &running_patch,
            0,
        )
        .unwrap();

    let outcome = store
        .recover_stale_job(job.id.as_str(), 120_000, 60_000, 3)
        .unwrap();

    assert_eq!(outcome.newly_failed_indices, vec![0]);
    assert_eq!(outcome.republish_indices, vec![0]);
    assert!(!outcome.job_failed);

    let sim = store.get_simulation(job.id.as_str(), "sim_000").unwrap();
    assert_eq!(sim.state, SimState::Failed);

    let reloaded = store.get_job(job.id.as_str()).unwrap();
    assert_eq!(reloaded.retry_count, 1);
    assert_eq!(reloaded.status, JobStatus::Queued);
}

#[test]
fn recover_stale_job_fails_job_after_max_retries_exceeded() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(4), 0).unwrap();
    store.initialize_simulations(job.id.as_str(), 1).unwrap();

    let running_patch =
        SimulationPatch { state: Some(SimState::Running), ..Default::default() };

    // First staleness: retry_count goes 0 -> 1, under max_retries (1), job stays open.
    store
        .update_simulation_status(job.id.as_str(), "sim_000", &running_patch, 0)
        .unwrap();
    let first = store
        .recover_stale_job(job.id.as_str(), 60_000, 60_000, 1)
        .unwrap();
    assert!(!first.job_failed);

    // Force the sim back to RUNNING (as if redelivered and picked up again) and go stale
    // a second time: retry_count goes 1 -> 2, exceeding max_retries (1).
    store
        .update_simulation_status(job.id.as_str(), "sim_000", &running_patch, 60_000)
        .unwrap();
    let second = store
        .recover_stale_job(job.id.as_str(), 120_000, 60_000, 1)
        .unwrap();
    assert!(second.job_failed);

    let reloaded = store.get_job(job.id.as_str()).unwrap();
    assert_eq!(reloaded.status, JobStatus::Failed);
    assert_eq!(reloaded.retry_count, 2);
    assert_eq!(reloaded.error_message.as_deref(), Some("max retries exceeded"));
}

#[test]
fn increment_completed_sim_count_accumulates() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(16), 0).unwrap();

    let (completed, total) = store.increment_completed_sim_count(job.id.as_str()).unwrap();
    assert_eq!(completed, 1);
    assert_eq!(total, job.total_sim_count);

    let (completed, _) = store.increment_completed_sim_count(job.id.as_str()).unwrap();
    assert_eq!(completed, 2);
}

#[test]
fn cancel_job_cancels_non_terminal_sims() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(8), 0).unwrap();
    store.initialize_simulations(job.id.as_str(), 2).unwrap();

    let complete_patch = SimulationPatch { state: Some(SimState::Completed), ..Default::default() };
    store
        .conditional_update_simulation_status(
            job.id.as_str(),
            "sim_000",
            &[SimState::Pending],
            &SimulationPatch { state: Some(SimState::Running), ..Default::default() },
            0,
        )
        .unwrap();
    store
        .conditional_update_simulation_status(
            job.id.as_str(),
            "sim_000",
            &[SimState::Running],
            &complete_patch,
            10,
        )
        .unwrap();

    let cancelled = store.cancel_job(job.id.as_str(), 20).unwrap();
    assert!(cancelled);

    let sims = store.get_simulations(job.id.as_str()).unwrap();
    assert_eq!(sims[0].state, SimState::Completed, "already-terminal sim is untouched");
    assert_eq!(sims[1].state, SimState::Cancelled);

    let reloaded = store.get_job(job.id.as_str()).unwrap();
    assert_eq!(reloaded.status, JobStatus::Cancelled);
}

#[test]
fn get_job_and_get_simulation_miss_cleanly() {
    let store = store();
    assert!(store.get_job("job-does-not-exist").is_none());

    let err = store.get_simulations("job-does-not-exist").unwrap_err();
    assert!(matches!(err, crate::Error::JobNotFound(_)));
}

#[test]
fn apply_job_patch_writes_through_non_status_fields() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(4), 0).unwrap();

    let patch = JobPatch { error_message: Some("transient".to_string()), ..Default::default() };
    let applied = store.apply_job_patch(job.id.as_str(), &patch).unwrap();
    assert!(applied);

    let reloaded = store.get_job(job.id.as_str()).unwrap();
    assert_eq!(reloaded.error_message.as_deref(), Some("transient"));
    assert_eq!(reloaded.status, JobStatus::Queued);
}

#[test]
fn apply_job_patch_rejects_illegal_status_transition() {
    let store = store();
    let job = store.create_job(JobId::new(), test_job_config(4), 0).unwrap();

    let patch = JobPatch { status: Some(JobStatus::Completed), ..Default::default() };
    let applied = store.apply_job_patch(job.id.as_str(), &patch).unwrap();
    assert!(!applied, "QUEUED -> COMPLETED is not a legal job transition");

    let reloaded = store.get_job(job.id.as_str()).unwrap();
    assert_eq!(reloaded.status, JobStatus::Queued);
}
