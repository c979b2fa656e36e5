// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn publish_emits_one_task_per_sim_index() {
    let bus = InMemoryTaskBus::new();
    bus.publish_simulation_tasks("job-1", 3);

    let mut seen = Vec::new();
    while let Some((_, task)) = bus.pull(0, 1_000) {
        seen.push(task.sim_index);
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2]);
}

#[test]
fn acked_task_is_not_redelivered() {
    let bus = InMemoryTaskBus::new();
    bus.publish_simulation_tasks("job-1", 1);

    let (delivery_id, _) = bus.pull(0, 1_000).expect("one task published");
    bus.ack(delivery_id);

    assert_eq!(bus.reap_expired(5_000), 0);
    assert!(bus.pull(5_000, 1_000).is_none());
}

#[test]
fn republish_for_indices_only_emits_the_given_sims() {
    let bus = InMemoryTaskBus::new();
    bus.publish_tasks_for_indices("job-1", &[1, 3], 4);

    let mut seen = Vec::new();
    while let Some((_, task)) = bus.pull(0, 1_000) {
        seen.push(task.sim_index);
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 3]);
}

#[test]
fn unacked_task_is_redelivered_after_visibility_window() {
    let bus = InMemoryTaskBus::new();
    bus.publish_simulation_tasks("job-1", 1);

    let (_, first) = bus.pull(0, 1_000).expect("one task published");
    assert!(bus.pull(500, 1_000).is_none(), "in-flight task stays invisible");

    let requeued = bus.reap_expired(1_500);
    assert_eq!(requeued, 1);

    let (_, redelivered) = bus.pull(1_600, 1_000).expect("task redelivered");
    assert_eq!(redelivered, first);
}

#[test]
fn queue_depth_counts_ready_and_in_flight() {
    let bus = InMemoryTaskBus::new();
    bus.publish_simulation_tasks("job-1", 3);
    assert_eq!(bus.queue_depth(), 3);

    bus.pull(0, 1_000);
    assert_eq!(bus.queue_depth(), 3, "pulled-but-unacked tasks still count");

    bus.ack(0);
    assert_eq!(bus.queue_depth(), 2);
}
