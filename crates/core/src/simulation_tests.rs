// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn sim_id_is_zero_padded_to_three_digits() {
    assert_eq!(sim_id(0), "sim_000");
    assert_eq!(sim_id(7), "sim_007");
    assert_eq!(sim_id(42), "sim_042");
}

#[test]
fn sim_id_widens_past_three_digits() {
    assert_eq!(sim_id(1000), "sim_1000");
}

#[test]
fn new_pending_sim_has_no_progress() {
    let sim = Simulation::new_pending(JobId::new(), 3);
    assert_eq!(sim.state, SimState::Pending);
    assert_eq!(sim.sim_id(), "sim_003");
    assert!(!sim.is_terminal());
    assert!(sim.winners.is_none());
}

#[test]
fn apply_patch_only_touches_set_fields() {
    let mut sim = Simulation::new_pending(JobId::new(), 0);
    sim.worker_id = Some("w1".to_string());

    let patch = SimulationPatch { state: Some(SimState::Running), ..Default::default() };
    sim.apply_patch(&patch);

    assert_eq!(sim.state, SimState::Running);
    assert_eq!(sim.worker_id.as_deref(), Some("w1"));
}

#[test]
fn apply_patch_sets_terminal_payload() {
    let mut sim = Simulation::new_pending(JobId::new(), 0);
    let patch = SimulationPatch {
        state: Some(SimState::Completed),
        winners: Some(vec!["a".into(), "b".into(), "c".into(), "a".into()]),
        winning_turns: Some(vec![5, 8, 6, 7]),
        duration_ms: Some(1234),
        ..Default::default()
    };
    sim.apply_patch(&patch);

    assert!(sim.is_terminal());
    assert_eq!(sim.winners.as_ref().unwrap().len(), 4);
    assert_eq!(sim.duration_ms, Some(1234));
}
