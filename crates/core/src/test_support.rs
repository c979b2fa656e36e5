// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test builders and helpers shared across crates (feature-gated).

use crate::job::{DeckSnapshot, Job, JobConfig, JobId};
use crate::worker::{WorkerId, WorkerInfo, WorkerStatus};

/// Build a `JobConfig` for a matchup of four placeholder decks.
pub fn test_job_config(requested_sims: u32) -> JobConfig {
    let deck = |n: &str| DeckSnapshot { name: n.to_string(), body: format!("{n}-body") };
    JobConfig {
        deck_ids: [
            "deck-a".to_string(),
            "deck-b".to_string(),
            "deck-c".to_string(),
            "deck-d".to_string(),
        ],
        deck_snapshot: [deck("deck-a"), deck("deck-b"), deck("deck-c"), deck("deck-d")],
        requested_sims,
        games_per_container: 4,
        idempotency_key: None,
        created_by: "tester".to_string(),
    }
}

/// Build a ready-to-register worker with plausible defaults.
pub fn test_worker(id: &str, last_heartbeat_ms: u64) -> WorkerInfo {
    WorkerInfo {
        worker_id: WorkerId::new(id),
        worker_name: format!("{id}-name"),
        status: WorkerStatus::Idle,
        capacity: 4,
        active_simulations: 0,
        last_heartbeat_ms,
        worker_api_url: None,
        max_concurrent_override: None,
        owner_email: None,
    }
}

pub fn test_job(id: JobId, requested_sims: u32, created_at_ms: u64) -> Job {
    Job::new(id, test_job_config(requested_sims), created_at_ms)
}
