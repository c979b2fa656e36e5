// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP-backed implementations of the engine's external-collaborator
//! contracts (deck resolution, log structuring, rating read/write). Their
//! own logic is out of scope per spec.md §1 — these adapters only carry
//! the request over the wire, the same way `sb_engine::WorkerRegistry`
//! carries a worker push.

use async_trait::async_trait;
use sb_core::DeckSnapshot;
use sb_engine::{DeckStore, EngineError, GameRecord, LogStore, RatingEngine, RatingStore, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Resolves deck ids against a configured upstream's `GET {base}/decks/{id}`.
pub struct HttpDeckStore {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl HttpDeckStore {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url, http: client() }
    }
}

#[async_trait]
impl DeckStore for HttpDeckStore {
    async fn resolve(&self, deck_id: &str) -> Result<DeckSnapshot> {
        let Some(base_url) = &self.base_url else {
            return Err(EngineError::BadRequest(format!("deck store not configured, cannot resolve {deck_id}")));
        };
        let url = format!("{}/decks/{deck_id}", base_url.trim_end_matches('/'));
        let resp = self.http.get(&url).send().await.map_err(|err| {
            warn!(deck_id, error = %err, "deck store request failed");
            EngineError::Upstream(err.to_string())
        })?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EngineError::BadRequest(format!("unknown deck id {deck_id}")));
        }
        if !resp.status().is_success() {
            return Err(EngineError::Upstream(format!("deck store returned {}", resp.status())));
        }
        resp.json::<DeckSnapshot>().await.map_err(|err| EngineError::Upstream(err.to_string()))
    }
}

#[derive(Deserialize)]
struct StructuredLogsResponse {
    games: Vec<GameRecordBody>,
}

#[derive(Serialize, Deserialize)]
struct GameRecordBody {
    sim_id: String,
    winner: String,
    winning_turn: u32,
}

impl From<GameRecordBody> for GameRecord {
    fn from(body: GameRecordBody) -> Self {
        Self { sim_id: body.sim_id, winner: body.winner, winning_turn: body.winning_turn }
    }
}

/// Fetches a job's structured game records from `GET {base}/jobs/{id}/games`.
pub struct HttpLogStore {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl HttpLogStore {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url, http: client() }
    }
}

#[async_trait]
impl LogStore for HttpLogStore {
    async fn structured(&self, job_id: &str, deck_names: &[String]) -> Result<Vec<GameRecord>> {
        let Some(base_url) = &self.base_url else {
            // No log collaborator configured: treat as "no games played"
            // rather than failing every aggregation outright.
            return Ok(Vec::new());
        };
        let url = format!("{}/jobs/{job_id}/games", base_url.trim_end_matches('/'));
        let resp = self
            .http
            .get(&url)
            .query(&[("deckNames", deck_names.join(","))])
            .send()
            .await
            .map_err(|err| EngineError::Upstream(err.to_string()))?;
        if !resp.status().is_success() {
            return Err(EngineError::Upstream(format!("log store returned {}", resp.status())));
        }
        let body: StructuredLogsResponse =
            resp.json().await.map_err(|err| EngineError::Upstream(err.to_string()))?;
        Ok(body.games.into_iter().map(GameRecord::from).collect())
    }
}

#[derive(Deserialize)]
struct HasResultsResponse {
    has_results: bool,
}

/// Checks `GET {base}/jobs/{id}/rated` for whether a job's rating data has
/// already been written — the guard `Aggregator::run` uses to short-circuit
/// re-entry.
pub struct HttpRatingStore {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl HttpRatingStore {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url, http: client() }
    }
}

#[async_trait]
impl RatingStore for HttpRatingStore {
    async fn has_results_for_job(&self, job_id: &str) -> Result<bool> {
        let Some(base_url) = &self.base_url else {
            return Ok(false);
        };
        let url = format!("{}/jobs/{job_id}/rated", base_url.trim_end_matches('/'));
        let resp = self.http.get(&url).send().await.map_err(|err| EngineError::Upstream(err.to_string()))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !resp.status().is_success() {
            return Err(EngineError::Upstream(format!("rating store returned {}", resp.status())));
        }
        let body: HasResultsResponse = resp.json().await.map_err(|err| EngineError::Upstream(err.to_string()))?;
        Ok(body.has_results)
    }
}

#[derive(Serialize)]
struct ProcessRatingBody<'a> {
    job_id: &'a str,
    deck_ids: &'a [String; 4],
    games: Vec<GameRecordBody>,
}

/// Posts a job's games to `POST {base}/rate` for the rating math
/// collaborator to fold into its model.
pub struct HttpRatingEngine {
    base_url: Option<String>,
    http: reqwest::Client,
}

impl HttpRatingEngine {
    pub fn new(base_url: Option<String>) -> Self {
        Self { base_url, http: client() }
    }
}

#[async_trait]
impl RatingEngine for HttpRatingEngine {
    async fn process(&self, job_id: &str, deck_ids: &[String; 4], games: &[GameRecord]) -> Result<()> {
        let Some(base_url) = &self.base_url else {
            return Ok(());
        };
        let url = format!("{}/rate", base_url.trim_end_matches('/'));
        let body = ProcessRatingBody {
            job_id,
            deck_ids,
            games: games
                .iter()
                .map(|g| GameRecordBody {
                    sim_id: g.sim_id.clone(),
                    winner: g.winner.clone(),
                    winning_turn: g.winning_turn,
                })
                .collect(),
        };
        let resp = self.http.post(&url).json(&body).send().await.map_err(|err| EngineError::Upstream(err.to_string()))?;
        if !resp.status().is_success() {
            return Err(EngineError::Upstream(format!("rating engine returned {}", resp.status())));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "collaborators_tests.rs"]
mod tests;
