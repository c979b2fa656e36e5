// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Aggregator: on terminal counter saturation, folds a job's games into the
//! rating model and marks the job COMPLETED or FAILED. Idempotent and safe
//! to invoke concurrently for the same `jobId`.

use std::sync::Arc;

use sb_core::{is_terminal_sim, Clock};
use sb_storage::JobStore;
use tracing::{info, instrument, warn};

use crate::collaborators::{LogStore, RatingEngine, RatingStore};
use crate::dedup::DedupSet;
use crate::progress_bus::ProgressBus;

pub struct Aggregator<C: Clock> {
    store: Arc<dyn JobStore>,
    logs: Arc<dyn LogStore>,
    ratings: Arc<dyn RatingStore>,
    rating_engine: Arc<dyn RatingEngine>,
    progress: Arc<dyn ProgressBus>,
    dedup: DedupSet,
    clock: C,
}

impl<C: Clock> Aggregator<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<dyn JobStore>,
        logs: Arc<dyn LogStore>,
        ratings: Arc<dyn RatingStore>,
        rating_engine: Arc<dyn RatingEngine>,
        progress: Arc<dyn ProgressBus>,
        dedup: DedupSet,
        clock: C,
    ) -> Self {
        Self { store, logs, ratings, rating_engine, progress, dedup, clock }
    }

    /// Runs the aggregation algorithm for `job_id`. A concurrent call for
    /// the same job while one is already in flight is a cheap no-op.
    #[instrument(skip(self), fields(job_id))]
    pub async fn run(&self, job_id: &str) {
        let Some(_guard) = self.dedup.try_acquire(job_id) else {
            return;
        };

        let now_ms = self.clock.epoch_ms();

        let already_rated = match self.ratings.has_results_for_job(job_id).await {
            Ok(v) => v,
            Err(err) => {
                warn!(job_id, error = %err, "rating store lookup failed, will retry on next trigger");
                return;
            }
        };
        if already_rated {
            if let Err(err) = self.store.set_job_completed(job_id, None, now_ms) {
                warn!(job_id, error = %err, "failed to mark already-rated job completed");
            }
            self.publish_terminal(job_id);
            return;
        }

        let sims = match self.store.get_simulations(job_id) {
            Ok(sims) => sims,
            Err(err) => {
                warn!(job_id, error = %err, "failed to load simulations for aggregation");
                return;
            }
        };
        if sims.iter().any(|s| !is_terminal_sim(s.state)) {
            return;
        }

        let job = match self.store.get_job(job_id) {
            Some(job) => job,
            None => return,
        };
        let deck_names: Vec<String> = job.deck_snapshot.iter().map(|d| d.name.clone()).collect();

        let games = match self.logs.structured(job_id, &deck_names).await {
            Ok(games) => games,
            Err(err) => {
                warn!(job_id, error = %err, "log retrieval failed");
                let _ = self.store.set_job_failed(job_id, &err.to_string(), None, now_ms);
                self.publish_terminal(job_id);
                return;
            }
        };

        let durations_ms: Vec<u64> = sims.iter().filter_map(|s| s.duration_ms).collect();

        if games.is_empty() {
            info!(job_id, "no games recorded, completing without a rating update");
            if let Err(err) = self.store.set_job_completed(job_id, Some(durations_ms), now_ms) {
                warn!(job_id, error = %err, "failed to complete game-less job");
            }
            self.publish_terminal(job_id);
            return;
        }

        if let Err(err) = self.rating_engine.process(job_id, &job.deck_ids, &games).await {
            warn!(job_id, error = %err, "rating engine failed");
            let _ = self.store.set_job_failed(job_id, &err.to_string(), Some(durations_ms), now_ms);
            self.publish_terminal(job_id);
            return;
        }

        if let Err(err) = self.store.set_job_completed(job_id, Some(durations_ms), now_ms) {
            warn!(job_id, error = %err, "failed to persist completion after a successful rating run");
        }
        self.publish_terminal(job_id);
    }

    fn publish_terminal(&self, job_id: &str) {
        if let Some(job) = self.store.get_job(job_id) {
            self.progress.publish_job(&job);
        }
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
