// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared `AppState` fixture for the HTTP handler test modules. Mirrors
//! `sb_engine::scheduler_tests`'s `build_scheduler` fakes, wired with
//! `SystemClock` since `AppState` is fixed to it.

#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use sb_core::{DeckSnapshot, SystemClock};
use sb_engine::{
    Aggregator, CancellationService, DeckStore, DedupSet, EngineError, GameRecord, InMemoryProgressBus,
    InMemoryTaskBus, LogStore, ProgressBus, RatingEngine, RatingStore, RecoveryService, Scheduler, SimReporter,
    TaskBus, WorkerRegistry,
};
use sb_storage::MemoryJobStore;

use crate::state::AppState;

pub struct FakeDeckStore;

#[async_trait]
impl DeckStore for FakeDeckStore {
    async fn resolve(&self, deck_id: &str) -> sb_engine::Result<DeckSnapshot> {
        Ok(DeckSnapshot { name: format!("{deck_id}-name"), body: format!("{deck_id}-body") })
    }
}

struct NoopLogStore;
#[async_trait]
impl LogStore for NoopLogStore {
    async fn structured(&self, _job_id: &str, _deck_names: &[String]) -> sb_engine::Result<Vec<GameRecord>> {
        Ok(Vec::new())
    }
}

struct NeverRatedStore;
#[async_trait]
impl RatingStore for NeverRatedStore {
    async fn has_results_for_job(&self, _job_id: &str) -> sb_engine::Result<bool> {
        Ok(false)
    }
}

struct NoopRatingEngine;
#[async_trait]
impl RatingEngine for NoopRatingEngine {
    async fn process(&self, _job_id: &str, _deck_ids: &[String; 4], _games: &[GameRecord]) -> sb_engine::Result<()> {
        Ok(())
    }
}

pub fn test_app_state() -> AppState {
    let store = Arc::new(MemoryJobStore::new());
    let progress: Arc<dyn ProgressBus> = Arc::new(InMemoryProgressBus::new());
    let task_bus: Arc<dyn TaskBus> = Arc::new(InMemoryTaskBus::new());
    let workers = Arc::new(WorkerRegistry::new());

    let aggregator = Arc::new(Aggregator::new(
        store.clone(),
        Arc::new(NoopLogStore),
        Arc::new(NeverRatedStore),
        Arc::new(NoopRatingEngine),
        progress.clone(),
        DedupSet::new(),
        SystemClock,
    ));
    let recovery =
        Arc::new(RecoveryService::new(store.clone(), aggregator.clone(), task_bus.clone(), SystemClock));
    let scheduler = Arc::new(Scheduler::new(
        store.clone(),
        task_bus,
        progress.clone(),
        Arc::new(FakeDeckStore),
        aggregator.clone(),
        recovery.clone(),
        SystemClock,
    ));
    let sim_reporter = Arc::new(SimReporter::new(store.clone(), progress.clone(), aggregator.clone(), SystemClock));
    let cancellation =
        Arc::new(CancellationService::new(store, workers.clone(), aggregator.clone(), SystemClock));

    AppState { scheduler, sim_reporter, aggregator, recovery, cancellation, workers, progress }
}

pub fn unwrap_api_error<T: std::fmt::Debug>(result: Result<T, crate::http::error::ApiError>) -> EngineError {
    match result {
        Ok(ok) => panic!("expected an error, got {ok:?}"),
        Err(crate::http::error::ApiError(err)) => err,
    }
}
