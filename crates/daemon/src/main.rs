// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `simbatchd`: binds the HTTP surface in spec.md §6 to an in-memory
//! `JobStore`/`TaskBus`/`ProgressBus` and the HTTP-backed deck/log/rating
//! collaborators configured via `sb_daemon::settings`.

use std::sync::Arc;

use sb_core::SystemClock;
use sb_daemon::collaborators::{HttpDeckStore, HttpLogStore, HttpRatingEngine, HttpRatingStore};
use sb_daemon::{settings, AppState};
use sb_engine::{
    Aggregator, CancellationService, DedupSet, InMemoryProgressBus, InMemoryTaskBus, ProgressBus, RecoveryService,
    Scheduler, SimReporter, TaskBus, WorkerRegistry,
};
use sb_storage::MemoryJobStore;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let store = Arc::new(MemoryJobStore::new());
    let progress: Arc<dyn ProgressBus> = Arc::new(InMemoryProgressBus::new());
    let task_bus: Arc<dyn TaskBus> = Arc::new(InMemoryTaskBus::new());
    let workers = Arc::new(WorkerRegistry::new());

    let aggregator = Arc::new(Aggregator::new(
        store.clone(),
        Arc::new(HttpLogStore::new(settings::log_store_url())),
        Arc::new(HttpRatingStore::new(settings::rating_store_url())),
        Arc::new(HttpRatingEngine::new(settings::rating_engine_url())),
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
        Arc::new(HttpDeckStore::new(settings::deck_store_url())),
        aggregator.clone(),
        recovery.clone(),
        SystemClock,
    ));
    let sim_reporter = Arc::new(SimReporter::new(store.clone(), progress.clone(), aggregator.clone(), SystemClock));
    let cancellation =
        Arc::new(CancellationService::new(store, workers.clone(), aggregator.clone(), SystemClock));

    let state = AppState { scheduler, sim_reporter, aggregator, recovery, cancellation, workers, progress };

    let bind = format!("{}:{}", settings::bind_addr(), settings::http_port());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "simbatchd listening");
    axum::serve(listener, sb_daemon::router(state)).await?;
    Ok(())
}
