// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker-facing JSON shapes.

use sb_core::{WorkerInfo, WorkerStatus};
use serde::{Deserialize, Serialize};

/// A worker registration as rendered by `GET /workers` and accepted by
/// `POST /workers/heartbeat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkerSummary {
    pub worker_id: String,
    pub worker_name: String,
    pub status: WorkerStatus,
    pub capacity: u32,
    pub active_simulations: u32,
    pub last_heartbeat_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_api_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_override: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
}

impl From<&WorkerInfo> for WorkerSummary {
    fn from(info: &WorkerInfo) -> Self {
        Self {
            worker_id: info.worker_id.as_str().to_string(),
            worker_name: info.worker_name.clone(),
            status: info.status,
            capacity: info.capacity,
            active_simulations: info.active_simulations,
            last_heartbeat_ms: info.last_heartbeat_ms,
            worker_api_url: info.worker_api_url.clone(),
            max_concurrent_override: info.max_concurrent_override,
            owner_email: info.owner_email.clone(),
        }
    }
}

impl WorkerSummary {
    /// Turns the wire body `POST /workers/heartbeat` accepts back into the
    /// domain type `WorkerRegistry::heartbeat` expects. `last_heartbeat_ms`
    /// is always overwritten by the registry with the server's clock, so
    /// whatever the worker sent for it is ignored here.
    pub fn into_worker_info(self) -> WorkerInfo {
        WorkerInfo {
            worker_id: sb_core::WorkerId::new(self.worker_id),
            worker_name: self.worker_name,
            status: self.status,
            capacity: self.capacity,
            active_simulations: self.active_simulations,
            last_heartbeat_ms: self.last_heartbeat_ms,
            worker_api_url: self.worker_api_url,
            max_concurrent_override: self.max_concurrent_override,
            owner_email: self.owner_email,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkersListResponse {
    pub workers: Vec<WorkerSummary>,
    pub queue_depth: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_override: Option<u32>,
}

/// Body of `PATCH /workers/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPatchBody {
    pub max_concurrent_override: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerPatchResponse {
    pub ok: bool,
    pub push_result: &'static str,
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
