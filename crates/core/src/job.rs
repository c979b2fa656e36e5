// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job: one user-submitted batch of simulations against a fixed 4-deck matchup.

use crate::state_machine::JobStatus;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a job instance.
    pub struct JobId("job-");
}

/// Number of decks a matchup is always played between.
pub const DECK_COUNT: usize = 4;

/// A deck identifier plus its resolved content, captured at job-create time.
///
/// Deck mutations after this point never affect an in-flight job —
/// the snapshot is the source of truth for the lifetime of the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSnapshot {
    pub name: String,
    pub body: String,
}

/// Config for creating a new job, assembled by the Scheduler after deck
/// resolution and before the first `JobStore::createJob` call.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub deck_ids: [String; DECK_COUNT],
    pub deck_snapshot: [DeckSnapshot; DECK_COUNT],
    pub requested_sims: u32,
    pub games_per_container: u32,
    pub idempotency_key: Option<String>,
    pub created_by: String,
}

impl JobConfig {
    /// `total_sim_count = ceil(requested_sims / games_per_container)`.
    pub fn total_sim_count(&self) -> u32 {
        self.requested_sims.div_ceil(self.games_per_container)
    }
}

/// A job instance: one batch of `total_sim_count` simulations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub deck_ids: [String; DECK_COUNT],
    pub deck_snapshot: [DeckSnapshot; DECK_COUNT],
    pub requested_sims: u32,
    pub games_per_container: u32,
    pub total_sim_count: u32,
    pub completed_sim_count: u32,
    pub status: JobStatus,
    pub created_at_ms: u64,
    pub claimed_at_ms: Option<u64>,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub worker_id: Option<String>,
    pub worker_name: Option<String>,
    pub error_message: Option<String>,
    pub retry_count: u32,
    pub container_durations_ms: Vec<u64>,
    pub idempotency_key: Option<String>,
    pub created_by: String,
}

impl Job {
    /// Create a new `QUEUED` job from `config`, captured at `created_at_ms`.
    pub fn new(id: JobId, config: JobConfig, created_at_ms: u64) -> Self {
        let total_sim_count = config.total_sim_count();
        Self {
            id,
            deck_ids: config.deck_ids,
            deck_snapshot: config.deck_snapshot,
            requested_sims: config.requested_sims,
            games_per_container: config.games_per_container,
            total_sim_count,
            completed_sim_count: 0,
            status: JobStatus::Queued,
            created_at_ms,
            claimed_at_ms: None,
            started_at_ms: None,
            completed_at_ms: None,
            worker_id: None,
            worker_name: None,
            error_message: None,
            retry_count: 0,
            container_durations_ms: Vec::new(),
            idempotency_key: config.idempotency_key,
            created_by: config.created_by,
        }
    }

    pub fn is_terminal(&self) -> bool {
        crate::state_machine::is_terminal_job(self.status)
    }

    /// True iff the counter has saturated without the job reaching a
    /// terminal status — the "stuck job" condition that effective-status
    /// derivation and recovery both check for.
    pub fn is_stuck(&self) -> bool {
        self.status == JobStatus::Running
            && self.total_sim_count > 0
            && self.completed_sim_count >= self.total_sim_count
    }

    /// Applies every `Some` field of `patch` onto `self`. Status is the
    /// caller's responsibility to validate against `can_job_transition`
    /// first — this just writes the fields through.
    pub fn apply_patch(&mut self, patch: &JobPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(worker_id) = &patch.worker_id {
            self.worker_id = Some(worker_id.clone());
        }
        if let Some(worker_name) = &patch.worker_name {
            self.worker_name = Some(worker_name.clone());
        }
        if let Some(error_message) = &patch.error_message {
            self.error_message = Some(error_message.clone());
        }
        if let Some(durations_ms) = &patch.durations_ms {
            self.container_durations_ms = durations_ms.clone();
        }
    }
}

/// A partial update applied to a `Job` by the worker-facing `PATCH
/// /jobs/{id}` endpoint. `status`, when set, is validated against
/// `can_job_transition` by the caller before `apply_patch` is invoked —
/// this type carries no validation of its own.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations_ms: Option<Vec<u64>>,
}

#[cfg(any(test, feature = "test-support"))]
impl Job {
    /// Test/demo builder: a queued job with plausible defaults.
    pub fn test_fixture(id: JobId, total_sim_count: u32) -> Self {
        let deck = |n: &str| DeckSnapshot { name: n.to_string(), body: format!("{n}-body") };
        Self::new(
            id,
            JobConfig {
                deck_ids: [
                    "deck-a".to_string(),
                    "deck-b".to_string(),
                    "deck-c".to_string(),
                    "deck-d".to_string(),
                ],
                deck_snapshot: [deck("deck-a"), deck("deck-b"), deck("deck-c"), deck("deck-d")],
                requested_sims: total_sim_count * 4,
                games_per_container: 4,
                idempotency_key: None,
                created_by: "tester".to_string(),
            },
            0,
        )
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
