// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Simulation-facing JSON shapes.

use sb_core::{SimState, Simulation};
use serde::{Deserialize, Serialize};

/// A simulation as rendered to HTTP clients, returned inside
/// `GET /jobs/{id}/simulations`'s `{simulations: [...]}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationStatus {
    pub sim_id: String,
    pub index: u32,
    pub state: SimState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_turns: Option<Vec<u32>>,
}

impl From<&Simulation> for SimulationStatus {
    fn from(sim: &Simulation) -> Self {
        Self {
            sim_id: sim.sim_id(),
            index: sim.index,
            state: sim.state,
            worker_id: sim.worker_id.clone(),
            worker_name: sim.worker_name.clone(),
            started_at_ms: sim.started_at_ms,
            completed_at_ms: sim.completed_at_ms,
            duration_ms: sim.duration_ms,
            error_message: sim.error_message.clone(),
            winners: sim.winners.clone(),
            winning_turns: sim.winning_turns.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationsListResponse {
    pub simulations: Vec<SimulationStatus>,
}

#[cfg(test)]
#[path = "simulation_tests.rs"]
mod tests;
