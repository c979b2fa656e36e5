// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation: one container execution running `G` games, child of a Job.

use crate::job::JobId;
use crate::state_machine::SimState;
use serde::{Deserialize, Serialize};

/// Render a sim's display id as `sim_NNN` (zero-padded, minimum 3 digits).
pub fn sim_id(index: u32) -> String {
    format!("sim_{index:03}")
}

/// One simulation record: `(jobId, simId)` identifies it uniquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub job_id: JobId,
    pub index: u32,
    pub state: SimState,
    pub worker_id: Option<String>,
    pub worker_name: Option<String>,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub duration_ms: Option<u64>,
    pub error_message: Option<String>,
    pub winners: Option<Vec<String>>,
    pub winning_turns: Option<Vec<u32>>,
}

impl Simulation {
    pub fn new_pending(job_id: JobId, index: u32) -> Self {
        Self {
            job_id,
            index,
            state: SimState::Pending,
            worker_id: None,
            worker_name: None,
            started_at_ms: None,
            completed_at_ms: None,
            duration_ms: None,
            error_message: None,
            winners: None,
            winning_turns: None,
        }
    }

    pub fn sim_id(&self) -> String {
        sim_id(self.index)
    }

    pub fn is_terminal(&self) -> bool {
        crate::state_machine::is_terminal_sim(self.state)
    }
}

/// A partial update applied to a `Simulation` by `SimReporter::UpdateSim`.
///
/// Only fields set to `Some` are applied; the rest of the record is
/// left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<SimState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_turns: Option<Vec<u32>>,
}

impl Simulation {
    /// Apply every `Some` field of `patch` onto `self`. Timestamps are the
    /// caller's responsibility (see `SimReporter`, which stamps them based
    /// on the transition being made, not on patch contents).
    pub fn apply_patch(&mut self, patch: &SimulationPatch) {
        if let Some(state) = patch.state {
            self.state = state;
        }
        if let Some(worker_id) = &patch.worker_id {
            self.worker_id = Some(worker_id.clone());
        }
        if let Some(worker_name) = &patch.worker_name {
            self.worker_name = Some(worker_name.clone());
        }
        if let Some(duration_ms) = patch.duration_ms {
            self.duration_ms = Some(duration_ms);
        }
        if let Some(error_message) = &patch.error_message {
            self.error_message = Some(error_message.clone());
        }
        if let Some(winners) = &patch.winners {
            self.winners = Some(winners.clone());
        }
        if let Some(winning_turns) = &patch.winning_turns {
            self.winning_turns = Some(winning_turns.clone());
        }
    }
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod tests;
