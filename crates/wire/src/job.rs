// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job-facing JSON shapes: the camelCase wire format clients see, distinct
//! from `sb_core::Job`'s snake-case Rust fields.

use sb_core::{Job, JobStatus};
use serde::{Deserialize, Serialize};

/// A job as rendered to HTTP clients. Used for both `GET /jobs` (inside a
/// `{jobs: [...]}` envelope) and `GET /jobs/{id}`; `status` is always the
/// Scheduler's *effective* status, never the raw stored one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: String,
    pub deck_ids: Vec<String>,
    pub deck_names: Vec<String>,
    pub requested_sims: u32,
    pub games_per_container: u32,
    pub total_sim_count: u32,
    pub completed_sim_count: u32,
    pub status: JobStatus,
    pub created_at_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub retry_count: u32,
    pub container_durations_ms: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    pub created_by: String,
}

impl JobView {
    /// `job` paired with its *effective* status, as returned by
    /// `Scheduler::get_job`/`list_jobs`.
    pub fn from_job(job: &Job, effective_status: JobStatus) -> Self {
        Self {
            id: job.id.to_string(),
            deck_ids: job.deck_ids.to_vec(),
            deck_names: job.deck_snapshot.iter().map(|d| d.name.clone()).collect(),
            requested_sims: job.requested_sims,
            games_per_container: job.games_per_container,
            total_sim_count: job.total_sim_count,
            completed_sim_count: job.completed_sim_count,
            status: effective_status,
            created_at_ms: job.created_at_ms,
            claimed_at_ms: job.claimed_at_ms,
            started_at_ms: job.started_at_ms,
            completed_at_ms: job.completed_at_ms,
            worker_id: job.worker_id.clone(),
            worker_name: job.worker_name.clone(),
            error_message: job.error_message.clone(),
            retry_count: job.retry_count,
            container_durations_ms: job.container_durations_ms.clone(),
            idempotency_key: job.idempotency_key.clone(),
            created_by: job.created_by.clone(),
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
