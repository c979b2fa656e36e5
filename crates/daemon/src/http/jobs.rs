// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-level route handlers. Each one is a thin translation between the
//! wire shapes in `sb_wire` and a single `AppState` entrypoint call — per
//! SPEC_FULL.md §4.11, no handler reaches past `AppState` into a
//! `JobStore`/`TaskBus` directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sb_engine::EngineError;
use sb_wire::{
    BulkDeleteBody, BulkDeleteResponse, CreateJobBody, CreateJobResponse, InitSimulationsBody,
    InitSimulationsResponse, JobView, JobsListResponse, PatchJobBody, RecoverResponse,
    SimulationStatus, SimulationsListResponse,
};

use crate::auth::CallerExt;
use crate::http::error::ApiError;
use crate::state::AppState;

const MAX_BULK_DELETE: usize = 50;

pub async fn create_job(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Json(body): Json<CreateJobBody>,
) -> Result<(StatusCode, Json<CreateJobResponse>), ApiError> {
    let result = state.scheduler.create_job(body.into(), &caller).await?;
    Ok((StatusCode::CREATED, Json(result.into())))
}

pub async fn list_jobs(State(state): State<AppState>, _caller: CallerExt) -> Json<JobsListResponse> {
    let jobs = state.scheduler.list_jobs();
    let jobs = jobs.into_iter().map(|(job, status)| JobView::from_job(&job, status)).collect();
    Json(JobsListResponse { jobs })
}

pub async fn get_job(
    State(state): State<AppState>,
    _caller: CallerExt,
    Path(job_id): Path<String>,
) -> Result<Json<JobView>, ApiError> {
    let (job, status) =
        state.scheduler.get_job(&job_id).ok_or_else(|| EngineError::NotFound(format!("job {job_id}")))?;
    Ok(Json(JobView::from_job(&job, status)))
}

pub async fn patch_job(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Path(job_id): Path<String>,
    Json(body): Json<PatchJobBody>,
) -> Result<Json<JobView>, ApiError> {
    let job = state.scheduler.patch_job(&job_id, body.into(), &caller)?;
    let status = state.scheduler.effective_status(&job);
    Ok(Json(JobView::from_job(&job, status)))
}

pub async fn cancel_job(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Path(job_id): Path<String>,
) -> Result<Json<sb_engine::CancelJobResult>, ApiError> {
    let result = state.cancellation.cancel_job(&job_id, &caller).await?;
    Ok(Json(result))
}

pub async fn delete_job(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Path(job_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.scheduler.delete_job(&job_id, &caller)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn bulk_delete_jobs(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Json(body): Json<BulkDeleteBody>,
) -> Result<Json<BulkDeleteResponse>, ApiError> {
    if body.job_ids.len() > MAX_BULK_DELETE {
        return Err(ApiError(EngineError::BadRequest(format!(
            "jobIds must have at most {MAX_BULK_DELETE} entries, got {}",
            body.job_ids.len()
        ))));
    }
    let results = state.scheduler.bulk_delete_jobs(&body.job_ids, &caller)?;
    Ok(Json(results.into()))
}

/// `GET /jobs/next`: `200 Job` when one was claimed, bare `204` otherwise.
pub async fn claim_next_job(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
) -> Result<Response, ApiError> {
    match state.scheduler.claim_next_job(&caller)? {
        Some(job) => {
            let status = state.scheduler.effective_status(&job);
            Ok(Json(JobView::from_job(&job, status)).into_response())
        }
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}

pub async fn recover_job(
    State(state): State<AppState>,
    _caller: CallerExt,
    Path(job_id): Path<String>,
) -> Json<RecoverResponse> {
    let result = state.recovery.run_recovery_check(&job_id).await;
    Json(result.into())
}

pub async fn init_simulations(
    State(state): State<AppState>,
    CallerExt(caller): CallerExt,
    Path(job_id): Path<String>,
    Json(body): Json<InitSimulationsBody>,
) -> Result<(StatusCode, Json<InitSimulationsResponse>), ApiError> {
    let initialized = state.scheduler.init_simulations(&job_id, body.count, &caller)?;
    Ok((StatusCode::CREATED, Json(InitSimulationsResponse { initialized })))
}

pub async fn list_simulations(
    State(state): State<AppState>,
    _caller: CallerExt,
    Path(job_id): Path<String>,
) -> Result<Json<SimulationsListResponse>, ApiError> {
    let sims = state.scheduler.list_simulations(&job_id)?;
    let simulations = sims.iter().map(SimulationStatus::from).collect();
    Ok(Json(SimulationsListResponse { simulations }))
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
