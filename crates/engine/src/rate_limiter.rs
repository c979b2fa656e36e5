// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sliding-window rate limiter for `Scheduler::CreateJob`.
//!
//! Tracks a token budget per caller, counted in requested sims rather than
//! request count, over a rolling window.

use std::collections::HashMap;

use parking_lot::Mutex;

struct CallerWindow {
    /// `(timestamp_ms, sims_requested)` entries within the window.
    entries: Vec<(u64, u32)>,
}

pub struct RateLimiter {
    window_ms: u64,
    budget: u32,
    callers: Mutex<HashMap<String, CallerWindow>>,
}

impl RateLimiter {
    pub fn new(window_ms: u64, budget: u32) -> Self {
        Self { window_ms, budget, callers: Mutex::new(HashMap::new()) }
    }

    /// Returns `true` (and records the request) iff `caller` has budget
    /// remaining for `requested_sims` within the current window.
    pub fn try_acquire(&self, caller_id: &str, requested_sims: u32, now_ms: u64) -> bool {
        let mut callers = self.callers.lock();
        let window = callers.entry(caller_id.to_string()).or_insert_with(|| CallerWindow { entries: Vec::new() });

        let cutoff = now_ms.saturating_sub(self.window_ms);
        window.entries.retain(|(ts, _)| *ts >= cutoff);

        let used: u32 = window.entries.iter().map(|(_, sims)| sims).sum();
        if used.saturating_add(requested_sims) > self.budget {
            return false;
        }

        window.entries.push((now_ms, requested_sims));
        true
    }
}

#[cfg(test)]
#[path = "rate_limiter_tests.rs"]
mod tests;
