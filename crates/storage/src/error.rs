// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-layer error kinds.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("simulation not found: {job_id}/{sim_id}")]
    SimNotFound { job_id: String, sim_id: String },

    #[error("idempotency key collision: a concurrent create won the race")]
    Conflict,
}

pub type Result<T> = std::result::Result<T, Error>;
