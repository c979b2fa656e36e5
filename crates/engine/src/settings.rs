// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

/// Liveness window for a worker's last heartbeat (default 45s).
pub fn heartbeat_ttl() -> Duration {
    env_secs("HEARTBEAT_TTL_SEC", 45)
}

/// Delay before a newly created job's first recovery check (default 600s).
pub fn t_recovery() -> Duration {
    env_secs("T_RECOVERY_SEC", 600)
}

/// Delay between recovery checks on a still-active job (default 300s).
pub fn t_retry() -> Duration {
    env_secs("T_RETRY_SEC", 300)
}

/// Staleness window for a `RUNNING` sim before recovery fails it out
/// (default 1800s).
pub fn t_sim_stale() -> Duration {
    env_secs("T_SIM_STALE_SEC", 1800)
}

/// Retry budget before a job is given up on (default 3).
pub fn max_retries() -> u32 {
    env_u32("MAX_RETRIES", 3)
}

/// Upper bound on `requestedSims` per job (default 100).
pub fn sim_max() -> u32 {
    env_u32("SIM_MAX", 100)
}

/// Upper bound on requested parallelism per job (default 16).
pub fn par_max() -> u32 {
    env_u32("PAR_MAX", 16)
}

/// Fixed batching factor between requested games and sim records
/// (default 4; see `GAMES_PER_CONTAINER` in the glossary).
pub fn games_per_container() -> u32 {
    env_u32("GAMES_PER_CONTAINER", 4)
}

/// Shared secret sent as an auth header on outbound worker pushes.
pub fn worker_shared_secret() -> Option<String> {
    std::env::var("WORKER_SHARED_SECRET").ok().filter(|s| !s.is_empty())
}

/// Per-worker timeout on outbound HTTP pushes (fixed at 5s per the design).
pub fn worker_push_timeout() -> Duration {
    Duration::from_secs(5)
}

/// Background aggregation timeout (fixed at 120s per the design).
pub fn aggregation_timeout() -> Duration {
    Duration::from_secs(120)
}

/// Sliding window over which `Scheduler::CreateJob`'s rate limit is
/// evaluated (fixed at 60s; not in spec.md's env var list, so not
/// independently overridable).
pub fn rate_limit_window() -> Duration {
    Duration::from_secs(60)
}

/// Per-caller sim budget within [`rate_limit_window`]. Scales with
/// `SIM_MAX` rather than its own env var, so a caller can burst at most
/// four max-size jobs per window — see DESIGN.md for this Open Question's
/// resolution.
pub fn rate_limit_budget() -> u32 {
    sim_max().saturating_mul(4)
}

fn env_secs(key: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_u64(key, default_secs))
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key).ok().and_then(|s| s.parse::<u64>().ok()).unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse::<u32>().ok()).unwrap_or(default)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
