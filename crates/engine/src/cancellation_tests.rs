// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use async_trait::async_trait;
use sb_core::test_support::test_job_config;
use sb_core::{Caller, FakeClock, JobId, JobStatus, SimState};
use sb_storage::{JobStore, MemoryJobStore};

use super::*;
use crate::collaborators::{GameRecord, LogStore, RatingEngine, RatingStore};
use crate::dedup::DedupSet;
use crate::progress_bus::{InMemoryProgressBus, ProgressBus};

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

fn build(store: Arc<MemoryJobStore>) -> CancellationService<FakeClock> {
    let progress: Arc<dyn ProgressBus> = Arc::new(InMemoryProgressBus::new());
    let aggregator = Arc::new(Aggregator::new(
        store.clone(),
        Arc::new(NoopLogStore),
        Arc::new(NeverRatedStore),
        Arc::new(NoopRatingEngine),
        progress,
        DedupSet::new(),
        FakeClock::new(),
    ));
    CancellationService::new(store, Arc::new(WorkerRegistry::new()), aggregator, FakeClock::new())
}

fn seed_running_job(store: &MemoryJobStore, total_sims: u32) -> String {
    let config = test_job_config(total_sims * 4);
    let job = store.create_job(JobId::new(), config, 0).unwrap();
    store.initialize_simulations(job.id.as_str(), total_sims).unwrap();
    store.set_job_started_at(job.id.as_str(), "w-1", "worker-one", 0).unwrap();
    job.id.to_string()
}

#[tokio::test]
async fn cancelling_unknown_job_is_not_found() {
    let store = Arc::new(MemoryJobStore::new());
    let service = build(store);
    let err = service.cancel_job("does-not-exist", &Caller::user("u-1")).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn cancelling_a_running_job_transitions_job_and_sims_to_cancelled() {
    let store = Arc::new(MemoryJobStore::new());
    let job_id = seed_running_job(&store, 2);
    let service = build(store.clone());

    let result = service.cancel_job(&job_id, &Caller::user("u-1")).await.unwrap();
    assert_eq!(result.id, job_id);
    assert_eq!(result.status, "cancelled");

    let job = store.get_job(&job_id).unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
    let sims = store.get_simulations(&job_id).unwrap();
    assert!(sims.iter().all(|s| s.state == SimState::Cancelled));
}

#[tokio::test]
async fn cancelling_an_already_terminal_job_is_a_conflict() {
    let store = Arc::new(MemoryJobStore::new());
    let job_id = seed_running_job(&store, 1);
    store.cancel_job(&job_id, 0).unwrap();

    let service = build(store);
    let err = service.cancel_job(&job_id, &Caller::user("u-1")).await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}
