// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `WorkerRegistry`: heartbeat ingestion, liveness, and per-worker config
//! push over outbound HTTP.

use std::collections::HashMap;

use parking_lot::Mutex;
use sb_core::{Caller, WorkerId, WorkerInfo};
use serde::Serialize;
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::settings;

/// Registry of worker liveness and per-worker overrides.
pub struct WorkerRegistry {
    workers: Mutex<HashMap<String, WorkerInfo>>,
    http: reqwest::Client,
    heartbeat_ttl_ms: u64,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self {
            workers: Mutex::new(HashMap::new()),
            http: reqwest::Client::new(),
            heartbeat_ttl_ms: settings::heartbeat_ttl().as_millis() as u64,
        }
    }

    /// Upserts `info`, returning any current `maxConcurrentOverride` so the
    /// worker can apply it locally.
    pub fn heartbeat(&self, mut info: WorkerInfo, now_ms: u64) -> Option<u32> {
        info.last_heartbeat_ms = now_ms;
        let mut workers = self.workers.lock();
        let existing_override = workers.get(info.worker_id.as_str()).and_then(|w| w.max_concurrent_override);
        if info.max_concurrent_override.is_none() {
            info.max_concurrent_override = existing_override;
        }
        let result = info.max_concurrent_override;
        workers.insert(info.worker_id.as_str().to_string(), info);
        result
    }

    pub fn list_active(&self, now_ms: u64) -> Vec<WorkerInfo> {
        self.workers
            .lock()
            .values()
            .filter(|w| w.is_active(now_ms, self.heartbeat_ttl_ms))
            .cloned()
            .collect()
    }

    pub fn get(&self, worker_id: &str) -> Option<WorkerInfo> {
        self.workers.lock().get(worker_id).cloned()
    }

    /// Permission-gated by `ownerEmail` match: only the worker's registered
    /// owner may change its override.
    pub async fn set_max_concurrent_override(
        &self,
        worker_id: &str,
        value: Option<u32>,
        caller: &Caller,
    ) -> Result<()> {
        let worker_api_url = {
            let mut workers = self.workers.lock();
            let worker = workers
                .get_mut(worker_id)
                .ok_or_else(|| EngineError::NotFound(format!("worker {worker_id}")))?;
            let owns = worker.owner_email.as_deref() == Some(caller.id.as_str());
            if !caller.is_admin() && !owns {
                return Err(EngineError::Forbidden("not the worker's registered owner".to_string()));
            }
            worker.max_concurrent_override = value;
            worker.worker_api_url.clone()
        };

        if let Some(url) = worker_api_url {
            #[derive(Serialize)]
            struct Body {
                max_concurrent_override: Option<u32>,
            }
            self.push_to_worker(&url, "/config", &Body { max_concurrent_override: value }).await;
        }
        Ok(())
    }

    /// Best-effort broadcast to every active worker's `path`. Per-worker
    /// failures are logged, never fatal to the caller.
    pub async fn push_to_all<B: Serialize + Sync>(&self, path: &str, body: &B, now_ms: u64) {
        let targets: Vec<String> =
            self.list_active(now_ms).into_iter().filter_map(|w| w.worker_api_url).collect();
        for url in targets {
            self.push_to_worker(&url, path, body).await;
        }
    }

    /// Fire one HTTP POST with a 5s timeout, authenticated by the shared
    /// secret header. Failures are logged, never propagated.
    pub async fn push_to_worker<B: Serialize + Sync>(&self, url: &str, path: &str, body: &B) {
        let target = format!("{}{}", url.trim_end_matches('/'), path);
        let mut req = self.http.post(&target).json(body).timeout(settings::worker_push_timeout());
        if let Some(secret) = settings::worker_shared_secret() {
            req = req.header("X-Worker-Shared-Secret", secret);
        }
        if let Err(err) = req.send().await {
            warn!(url = %target, error = %err, "worker push failed");
        }
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "worker_registry_tests.rs"]
mod tests;
