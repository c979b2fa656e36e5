// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sb_core::{JobId, SimState, Simulation};

use super::*;

#[test]
fn from_simulation_copies_every_field() {
    let mut sim = Simulation::new_pending(JobId::new(), 2);
    sim.state = SimState::Completed;
    sim.worker_id = Some("w-1".to_string());
    sim.duration_ms = Some(1_200);
    sim.winners = Some(vec!["a".to_string(), "b".to_string(), "c".to_string(), "a".to_string()]);
    sim.winning_turns = Some(vec![5, 8, 6, 7]);

    let status = SimulationStatus::from(&sim);

    assert_eq!(status.sim_id, "sim_002");
    assert_eq!(status.index, 2);
    assert_eq!(status.state, SimState::Completed);
    assert_eq!(status.worker_id.as_deref(), Some("w-1"));
    assert_eq!(status.duration_ms, Some(1_200));
    assert_eq!(status.winning_turns, Some(vec![5, 8, 6, 7]));
}

#[test]
fn serializes_sim_id_as_camel_case() {
    let sim = Simulation::new_pending(JobId::new(), 0);
    let status = SimulationStatus::from(&sim);
    let value = serde_json::to_value(&status).unwrap();
    assert_eq!(value["simId"], "sim_000");
    assert!(value.get("winners").is_none());
}
