// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route table for the HTTP surface (spec.md §6).

pub mod error;
pub mod jobs;
pub mod simulations;
pub mod stream;
pub mod workers;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/jobs", post(jobs::create_job).get(jobs::list_jobs))
        .route("/jobs/next", get(jobs::claim_next_job))
        .route("/jobs/bulk-delete", post(jobs::bulk_delete_jobs))
        .route("/jobs/:id", get(jobs::get_job).patch(jobs::patch_job).delete(jobs::delete_job))
        .route("/jobs/:id/cancel", post(jobs::cancel_job))
        .route("/jobs/:id/recover", post(jobs::recover_job))
        .route("/jobs/:id/simulations", post(jobs::init_simulations).get(jobs::list_simulations))
        .route("/jobs/:id/simulations/:sim_id", patch(simulations::patch_simulation))
        .route("/jobs/:id/stream", get(stream::stream_job))
        .route("/workers/heartbeat", post(workers::heartbeat))
        .route("/workers", get(workers::list_workers))
        .route("/workers/:id", patch(workers::patch_worker))
        .with_state(state)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
