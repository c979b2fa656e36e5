// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ProgressBus`: streams job and sim snapshots to subscribed clients.
//!
//! No durability: a subscriber that misses events catches up by reading
//! current state over the regular REST surface on reconnect. Internally
//! this is a per-job broadcast channel; a backend with no native push
//! support could instead implement `subscribe` by polling storage on an
//! interval — callers only depend on the stream contract.

use std::collections::HashMap;

use parking_lot::Mutex;
use sb_core::{is_terminal_job, Job, Simulation};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Job(Job),
    Sims(Vec<Simulation>),
}

pub trait ProgressBus: Send + Sync {
    fn publish_job(&self, job: &Job);
    fn publish_sims(&self, job_id: &str, sims: &[Simulation]);
    /// Subscribe to `job_id`'s stream. The receiver yields events until the
    /// job reaches a terminal status or the subscriber drops the receiver.
    fn subscribe(&self, job_id: &str) -> broadcast::Receiver<ProgressEvent>;
}

#[derive(Default)]
pub struct InMemoryProgressBus {
    channels: Mutex<HashMap<String, broadcast::Sender<ProgressEvent>>>,
}

impl InMemoryProgressBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn channel(&self, job_id: &str) -> broadcast::Sender<ProgressEvent> {
        let mut channels = self.channels.lock();
        channels
            .entry(job_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

impl ProgressBus for InMemoryProgressBus {
    fn publish_job(&self, job: &Job) {
        let sender = self.channel(job.id.as_str());
        // No receivers is the common case between subscribers; not an error.
        let _ = sender.send(ProgressEvent::Job(job.clone()));
        if is_terminal_job(job.status) {
            self.channels.lock().remove(job.id.as_str());
        }
    }

    fn publish_sims(&self, job_id: &str, sims: &[Simulation]) {
        // Unlike `publish_job`, this must not resurrect a channel
        // `publish_job` already dropped for a terminal job — there's no
        // later point that would ever remove it again.
        let Some(sender) = self.channels.lock().get(job_id).cloned() else {
            return;
        };
        let _ = sender.send(ProgressEvent::Sims(sims.to_vec()));
    }

    fn subscribe(&self, job_id: &str) -> broadcast::Receiver<ProgressEvent> {
        self.channel(job_id).subscribe()
    }
}

#[cfg(test)]
#[path = "progress_bus_tests.rs"]
mod tests;
