// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AppState`: the only thing HTTP handlers are allowed to reach into.
//!
//! Per SPEC_FULL.md §4.11, handlers never touch `JobStore`/`TaskBus`
//! directly — only the entrypoint structs each component exposes.

use std::sync::Arc;

use sb_core::SystemClock;
use sb_engine::{Aggregator, CancellationService, ProgressBus, RecoveryService, Scheduler, SimReporter, WorkerRegistry};

#[derive(Clone)]
pub struct AppState {
    pub scheduler: Arc<Scheduler<SystemClock>>,
    pub sim_reporter: Arc<SimReporter<SystemClock>>,
    pub aggregator: Arc<Aggregator<SystemClock>>,
    pub recovery: Arc<RecoveryService<SystemClock>>,
    pub cancellation: Arc<CancellationService<SystemClock>>,
    pub workers: Arc<WorkerRegistry>,
    pub progress: Arc<dyn ProgressBus>,
}
