// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-facing route handlers: heartbeat ingestion, the worker list, and
//! per-worker override patches.

use axum::extract::{Path, State};
use axum::Json;
use sb_core::{Clock, SystemClock};
use sb_wire::{HeartbeatResponse, WorkerPatchBody, WorkerPatchResponse, WorkerSummary, WorkersListResponse};

use crate::auth::CallerExt;
use crate::http::error::ApiError;
use crate::state::AppState;

pub async fn heartbeat(
    State(state): State<AppState>,
    _caller: CallerExt,
    Json(body): Json<WorkerSummary>,
) -> Json<HeartbeatResponse> {
    let now_ms = SystemClock.epoch_ms();
    let max_concurrent_override = state.workers.heartbeat(body.into_worker_info(), now_ms);
    Json(HeartbeatResponse { ok: true, max_concurrent_override })
}

pub async fn list_workers(State(state): State<AppState>, _caller: CallerExt) -> Json<WorkersListResponse> {
    let now_ms = SystemClock.epoch_ms();
    let workers = state.workers.list_active(now_ms).iter().map(WorkerSummary::from).collect();
    let queue_depth = state.scheduler.queue_depth();
    Json(WorkersListResponse { workers, queue_depth })
}

pub async fn patch_worker(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Path(worker_id): Path<String>,
    Json(body): Json<WorkerPatchBody>,
) -> Result<Json<WorkerPatchResponse>, ApiError> {
    state.workers.set_max_concurrent_override(&worker_id, body.max_concurrent_override, &caller).await?;
    let push_result = match state.workers.get(&worker_id).and_then(|w| w.worker_api_url) {
        Some(_) => "pushed",
        None => "no_push_target",
    };
    Ok(Json(WorkerPatchResponse { ok: true, push_result }))
}

#[cfg(test)]
#[path = "workers_tests.rs"]
mod tests;
