// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `TaskBus`: at-least-once delivery of per-sim tasks from the Scheduler to
//! workers.
//!
//! The contract only assumes at-least-once delivery, per-message ack, and no
//! global ordering — a managed message service satisfies it just as well as
//! the in-process queue here. Workers are a shared competing-consumer
//! group: a pulled task is invisible to other pulls until it's acked or its
//! visibility window lapses, at which point it's eligible for redelivery.

use std::collections::VecDeque;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One unit of work: run a single simulation's container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTask {
    pub job_id: String,
    pub sim_id: String,
    pub sim_index: u32,
    pub total_sims: u32,
}

struct InFlight {
    task: SimTask,
    delivery_id: u64,
    visible_after_ms: u64,
}

#[derive(Default)]
struct State {
    ready: VecDeque<SimTask>,
    in_flight: Vec<InFlight>,
    next_delivery_id: u64,
}

pub trait TaskBus: Send + Sync {
    /// Emits `total_sims` messages for `job_id`, one per sim index. Ordering
    /// is not guaranteed and duplicates may occur under retry.
    fn publish_simulation_tasks(&self, job_id: &str, total_sims: u32) {
        let indices: Vec<u32> = (0..total_sims).collect();
        self.publish_tasks_for_indices(job_id, &indices, total_sims);
    }

    /// Emits one message per index in `sim_indices`, used both by the
    /// default `publish_simulation_tasks` (the full `0..total_sims` range)
    /// and by recovery's selective republish of `PENDING`/newly-`FAILED`
    /// sims.
    fn publish_tasks_for_indices(&self, job_id: &str, sim_indices: &[u32], total_sims: u32);

    /// Pull one ready task, if any, marking it invisible until
    /// `now_ms + visibility_ms` unless acked first. Returns `(delivery_id, task)`.
    fn pull(&self, now_ms: u64, visibility_ms: u64) -> Option<(u64, SimTask)>;

    /// Acknowledge successful processing of `delivery_id`, removing it
    /// permanently. Acking an unknown or already-expired delivery is a no-op.
    fn ack(&self, delivery_id: u64);

    /// Move any in-flight tasks whose visibility window has lapsed back onto
    /// the ready queue for redelivery. Returns how many were requeued.
    fn reap_expired(&self, now_ms: u64) -> usize;

    /// Total outstanding tasks (ready for pull plus currently in flight).
    /// Surfaced by `GET /workers` as `queueDepth`.
    fn queue_depth(&self) -> usize;
}

/// In-process `TaskBus`. Does not survive a process restart; see
/// DESIGN.md for why that's an acceptable default here.
#[derive(Default)]
pub struct InMemoryTaskBus {
    state: Mutex<State>,
}

impl InMemoryTaskBus {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskBus for InMemoryTaskBus {
    fn publish_tasks_for_indices(&self, job_id: &str, sim_indices: &[u32], total_sims: u32) {
        let mut state = self.state.lock();
        for &sim_index in sim_indices {
            state.ready.push_back(SimTask {
                job_id: job_id.to_string(),
                sim_id: sb_core::sim_id(sim_index),
                sim_index,
                total_sims,
            });
        }
    }

    fn pull(&self, now_ms: u64, visibility_ms: u64) -> Option<(u64, SimTask)> {
        let mut state = self.state.lock();
        let task = state.ready.pop_front()?;
        let delivery_id = state.next_delivery_id;
        state.next_delivery_id += 1;
        state.in_flight.push(InFlight {
            task: task.clone(),
            delivery_id,
            visible_after_ms: now_ms + visibility_ms,
        });
        Some((delivery_id, task))
    }

    fn ack(&self, delivery_id: u64) {
        let mut state = self.state.lock();
        state.in_flight.retain(|f| f.delivery_id != delivery_id);
    }

    fn reap_expired(&self, now_ms: u64) -> usize {
        let mut state = self.state.lock();
        let mut expired = Vec::new();
        state.in_flight.retain(|f| {
            if f.visible_after_ms <= now_ms {
                expired.push(f.task.clone());
                false
            } else {
                true
            }
        });
        let count = expired.len();
        state.ready.extend(expired);
        count
    }

    fn queue_depth(&self) -> usize {
        let state = self.state.lock();
        state.ready.len() + state.in_flight.len()
    }
}

#[cfg(test)]
#[path = "task_bus_tests.rs"]
mod tests;
