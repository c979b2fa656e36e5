// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn worker(last_heartbeat_ms: u64) -> WorkerInfo {
    WorkerInfo {
        worker_id: WorkerId::new("w1"),
        worker_name: "worker-1".to_string(),
        status: WorkerStatus::Idle,
        capacity: 4,
        active_simulations: 0,
        last_heartbeat_ms,
        worker_api_url: None,
        max_concurrent_override: None,
        owner_email: None,
    }
}

#[test]
fn active_within_ttl() {
    let w = worker(1_000);
    assert!(w.is_active(1_040, 45_000));
}

#[test]
fn inactive_past_ttl() {
    let w = worker(1_000);
    assert!(!w.is_active(50_000, 45_000));
}

#[test]
fn exactly_at_ttl_boundary_is_inactive() {
    let w = worker(0);
    assert!(!w.is_active(45_000, 45_000));
}

#[test]
fn worker_id_borrows_as_str_for_map_lookup() {
    use std::collections::HashMap;
    let mut map = HashMap::new();
    map.insert(WorkerId::new("w1"), 1);
    assert_eq!(map.get("w1"), Some(&1));
}
