// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request bodies accepted by the HTTP surface, translated into the
//! engine's own request/patch types.

use sb_core::{JobPatch, JobStatus, SimulationPatch};
use sb_engine::CreateJobRequest;
use serde::Deserialize;

/// Body of `POST /jobs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobBody {
    pub deck_ids: Vec<String>,
    pub simulations: u32,
    #[serde(default)]
    pub parallelism: Option<u32>,
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

impl From<CreateJobBody> for CreateJobRequest {
    fn from(body: CreateJobBody) -> Self {
        Self {
            deck_ids: body.deck_ids,
            requested_sims: body.simulations,
            parallelism: body.parallelism,
            idempotency_key: body.idempotency_key,
        }
    }
}

/// Body of `PATCH /jobs/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchJobBody {
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub worker_name: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub durations: Option<Vec<u64>>,
}

impl From<PatchJobBody> for JobPatch {
    fn from(body: PatchJobBody) -> Self {
        Self {
            status: body.status,
            worker_id: body.worker_id,
            worker_name: body.worker_name,
            error_message: body.error_message,
            durations_ms: body.durations,
        }
    }
}

/// Body of `POST /jobs/{id}/simulations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSimulationsBody {
    pub count: u32,
}

/// Body of `PATCH /jobs/{id}/simulations/{simId}`: a partial
/// `SimulationStatus`, translated straight into `sb_core::SimulationPatch`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchSimulationBody {
    #[serde(default)]
    pub state: Option<sb_core::SimState>,
    #[serde(default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub worker_name: Option<String>,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub winners: Option<Vec<String>>,
    #[serde(default)]
    pub winning_turns: Option<Vec<u32>>,
}

impl From<PatchSimulationBody> for SimulationPatch {
    fn from(body: PatchSimulationBody) -> Self {
        Self {
            state: body.state,
            worker_id: body.worker_id,
            worker_name: body.worker_name,
            duration_ms: body.duration_ms,
            error_message: body.error_message,
            winners: body.winners,
            winning_turns: body.winning_turns,
        }
    }
}

/// Body of `POST /jobs/bulk-delete`. The handler enforces the `≤50` bound
/// from spec.md's external-interfaces table; this type carries no limit
/// of its own.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteBody {
    pub job_ids: Vec<String>,
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
