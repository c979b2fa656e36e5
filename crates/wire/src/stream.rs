// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `GET /jobs/{id}/stream` event shapes. The daemon owns the actual SSE
//! framing (axum's `Sse`/`Event`); this module only decides what JSON goes
//! over the wire for each `ProgressEvent` the engine's `ProgressBus`
//! produces.

use sb_engine::ProgressEvent;
use serde::Serialize;

use crate::job::JobView;
use crate::simulation::SimulationStatus;

/// One server-sent event: `event:` is `job` or `sims`, `data:` is the
/// serialized payload below.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Job(JobView),
    Sims(Vec<SimulationStatus>),
}

impl StreamEvent {
    /// SSE `event:` field name for this variant.
    pub fn event_name(&self) -> &'static str {
        match self {
            StreamEvent::Job(_) => "job",
            StreamEvent::Sims(_) => "sims",
        }
    }
}

impl From<&ProgressEvent> for StreamEvent {
    fn from(event: &ProgressEvent) -> Self {
        match event {
            // Snapshots published mid-transition always carry the stored
            // status verbatim; the "stuck job" derivation is a read-path
            // concern for `GET /jobs`, not something the bus recomputes.
            ProgressEvent::Job(job) => StreamEvent::Job(JobView::from_job(job, job.status)),
            ProgressEvent::Sims(sims) => StreamEvent::Sims(sims.iter().map(SimulationStatus::from).collect()),
        }
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
