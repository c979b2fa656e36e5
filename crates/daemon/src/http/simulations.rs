// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PATCH /jobs/{id}/simulations/{simId}`: the per-sim worker report.

use axum::extract::{Path, State};
use axum::Json;
use sb_wire::PatchSimulationBody;

use crate::auth::CallerExt;
use crate::http::error::ApiError;
use crate::state::AppState;

pub async fn patch_simulation(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Path((job_id, sim_id)): Path<(String, String)>,
    Json(body): Json<PatchSimulationBody>,
) -> Result<Json<sb_engine::UpdateSimOutcome>, ApiError> {
    let outcome = state.sim_reporter.update_sim(&job_id, &sim_id, body.into(), &caller).await?;
    Ok(Json(outcome))
}

#[cfg(test)]
#[path = "simulations_tests.rs"]
mod tests;
