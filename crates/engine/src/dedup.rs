// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-local dedup set, shared by Aggregator (guarding against
//! concurrent runs per `jobId`) and Scheduler (guarding against concurrent
//! recovery-aggregation launches). Best-effort only — the distributed case
//! still relies on `RatingStore::hasResultsForJob` for correctness.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Clone, Default)]
pub struct DedupSet {
    inflight: Arc<Mutex<HashSet<String>>>,
}

/// RAII guard: releases its key from the set on drop, so a panicking or
/// early-returning task never leaves a job permanently locked out.
pub struct DedupGuard {
    set: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl Drop for DedupGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim `key`. Returns `None` if already claimed.
    pub fn try_acquire(&self, key: &str) -> Option<DedupGuard> {
        let mut inflight = self.inflight.lock();
        if !inflight.insert(key.to_string()) {
            return None;
        }
        Some(DedupGuard { set: self.inflight.clone(), key: key.to_string() })
    }
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
