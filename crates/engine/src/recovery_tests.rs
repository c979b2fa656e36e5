// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use async_trait::async_trait;
use sb_core::test_support::test_job_config;
use sb_core::{FakeClock, JobId, JobStatus, SimState, SimulationPatch};
use sb_storage::{JobStore, MemoryJobStore};
use serial_test::serial;

use super::*;
use crate::collaborators::{GameRecord, LogStore, RatingEngine, RatingStore};
use crate::dedup::DedupSet;
use crate::progress_bus::{InMemoryProgressBus, ProgressBus};
use crate::task_bus::InMemoryTaskBus;

struct NoopLogStore;
#[async_trait]
impl LogStore for NoopLogStore {
    async fn structured(&self, _job_id: &str, _deck_names: &[String]) -> crate::error::Result<Vec<GameRecord>> {
        Ok(Vec::new())
    }
}

struct NeverRatedStore;
#[async_trait]
impl RatingStore for NeverRatedStore {
    async fn has_results_for_job(&self, _job_id: &str) -> crate::error::Result<bool> {
        Ok(false)
    }
}

struct NoopRatingEngine;
#[async_trait]
impl RatingEngine for NoopRatingEngine {
    async fn process(&self, _job_id: &str, _deck_ids: &[String; 4], _games: &[GameRecord]) -> crate::error::Result<()> {
        Ok(())
    }
}

fn build(store: Arc<MemoryJobStore>, clock: FakeClock) -> (RecoveryService<FakeClock>, Arc<InMemoryTaskBus>) {
    let progress: Arc<dyn ProgressBus> = Arc::new(InMemoryProgressBus::new());
    let aggregator = Arc::new(Aggregator::new(
        store.clone(),
        Arc::new(NoopLogStore),
        Arc::new(NeverRatedStore),
        Arc::new(NoopRatingEngine),
        progress,
        DedupSet::new(),
        clock.clone(),
    ));
    let task_bus = Arc::new(InMemoryTaskBus::new());
    let recovery = RecoveryService::new(store, aggregator, task_bus.clone() as Arc<dyn TaskBus>, clock);
    (recovery, task_bus)
}

fn seed_running_job(store: &MemoryJobStore, total_sims: u32, now_ms: u64) -> String {
    let config = test_job_config(total_sims * 4);
    let job = store.create_job(JobId::new(), config, now_ms).unwrap();
    store.initialize_simulations(job.id.as_str(), total_sims).unwrap();
    store.set_job_started_at(job.id.as_str(), "w-1", "worker-one", now_ms).unwrap();
    job.id.to_string()
}

#[tokio::test]
async fn recovery_check_on_unknown_job_is_a_noop() {
    let store = Arc::new(MemoryJobStore::new());
    let (recovery, task_bus) = build(store, FakeClock::new());
    recovery.run_recovery_check("job-does-not-exist").await;
    assert!(task_bus.pull(0, 1_000).is_none());
}

#[tokio::test]
async fn recovery_check_on_terminal_job_is_a_noop() {
    let store = Arc::new(MemoryJobStore::new());
    let job_id = seed_running_job(&store, 1, 0);
    store.cancel_job(&job_id, 0).unwrap();

    let (recovery, task_bus) = build(store.clone(), FakeClock::new());
    let result = recovery.run_recovery_check(&job_id).await;
    assert!(task_bus.pull(0, 1_000).is_none());
    assert_eq!(result.status, JobStatus::Cancelled);
    assert_eq!(result.still_active, Some(false));
    assert_eq!(result.recovered, None);
}

#[tokio::test]
async fn stuck_job_dispatches_aggregation_instead_of_stale_recovery() {
    let store = Arc::new(MemoryJobStore::new());
    let job_id = seed_running_job(&store, 1, 0);
    let sims = store.get_simulations(&job_id).unwrap();
    let patch = SimulationPatch { state: Some(SimState::Completed), duration_ms: Some(1_000), ..Default::default() };
    store.update_simulation_status(&job_id, &sims[0].sim_id(), &patch, 0).unwrap();
    store.increment_completed_sim_count(&job_id).unwrap();

    let (recovery, task_bus) = build(store.clone(), FakeClock::new());
    let result = recovery.run_recovery_check(&job_id).await;

    let job = store.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(task_bus.pull(0, 1_000).is_none(), "a stuck job must not republish tasks");
    assert_eq!(result.recovered, Some(true));
    assert_eq!(result.status, JobStatus::Completed);
}

#[tokio::test]
#[serial]
async fn stale_running_sim_is_failed_and_republished() {
    std::env::set_var("T_SIM_STALE_SEC", "10");
    std::env::set_var("MAX_RETRIES", "3");

    let clock = FakeClock::new();
    clock.set_epoch_ms(0);
    let store = Arc::new(MemoryJobStore::new());
    let job_id = seed_running_job(&store, 2, 0);
    let sims = store.get_simulations(&job_id).unwrap();
    let patch = SimulationPatch { state: Some(SimState::Running), ..Default::default() };
    store.update_simulation_status(&job_id, &sims[0].sim_id(), &patch, 0).unwrap();

    clock.set_epoch_ms(20_000);
    let (recovery, task_bus) = build(store.clone(), clock);
    recovery.run_recovery_check(&job_id).await;

    let mut seen = Vec::new();
    while let Some((_, task)) = task_bus.pull(20_000, 1_000) {
        seen.push(task.sim_index);
    }
    assert!(seen.contains(&0), "the stale sim's index must be republished");

    std::env::remove_var("T_SIM_STALE_SEC");
    std::env::remove_var("MAX_RETRIES");
}

#[tokio::test]
#[serial]
async fn job_failed_out_after_exceeding_max_retries_does_not_republish() {
    std::env::set_var("T_SIM_STALE_SEC", "10");
    std::env::set_var("MAX_RETRIES", "0");

    let clock = FakeClock::new();
    clock.set_epoch_ms(0);
    let store = Arc::new(MemoryJobStore::new());
    let job_id = seed_running_job(&store, 1, 0);
    let sims = store.get_simulations(&job_id).unwrap();
    let patch = SimulationPatch { state: Some(SimState::Running), ..Default::default() };
    store.update_simulation_status(&job_id, &sims[0].sim_id(), &patch, 0).unwrap();

    clock.set_epoch_ms(20_000);
    let (recovery, task_bus) = build(store.clone(), clock);
    recovery.run_recovery_check(&job_id).await;

    let job = store.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(task_bus.pull(20_000, 1_000).is_none());

    std::env::remove_var("T_SIM_STALE_SEC");
    std::env::remove_var("MAX_RETRIES");
}
