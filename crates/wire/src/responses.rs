// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response envelopes for the HTTP surface, built from engine-layer result
//! types that don't already carry a wire-shaped `Serialize` impl.

use sb_core::JobStatus;
use sb_engine::{CreateJobResult, RecoveryCheckResult};
use serde::Serialize;

use crate::job::JobView;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsListResponse {
    pub jobs: Vec<JobView>,
}

/// `201` body of `POST /jobs`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobResponse {
    pub id: String,
    pub deck_names: Vec<String>,
}

impl From<CreateJobResult> for CreateJobResponse {
    fn from(result: CreateJobResult) -> Self {
        Self { id: result.job_id, deck_names: result.deck_names }
    }
}

/// `201` body of `POST /jobs/{id}/simulations`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitSimulationsResponse {
    pub initialized: u32,
}

/// Body of `POST /jobs/{id}/recover`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecoverResponse {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovered: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub still_active: Option<bool>,
}

impl From<RecoveryCheckResult> for RecoverResponse {
    fn from(result: RecoveryCheckResult) -> Self {
        Self { status: result.status, recovered: result.recovered, still_active: result.still_active }
    }
}

/// One job's outcome inside `POST /jobs/bulk-delete`'s `results` array.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub job_id: String,
    pub deleted: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub deleted_count: usize,
    pub results: Vec<BulkDeleteResult>,
}

impl From<Vec<(String, bool)>> for BulkDeleteResponse {
    fn from(outcomes: Vec<(String, bool)>) -> Self {
        let deleted_count = outcomes.iter().filter(|(_, deleted)| *deleted).count();
        let results = outcomes.into_iter().map(|(job_id, deleted)| BulkDeleteResult { job_id, deleted }).collect();
        Self { deleted_count, results }
    }
}

/// Body of every non-2xx response, per spec.md §7.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
#[path = "responses_tests.rs"]
mod tests;
