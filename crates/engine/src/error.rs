// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-level error kinds, surfaced to the HTTP layer as status codes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("rate limited")]
    RateLimited,

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sb_storage::Error> for EngineError {
    fn from(err: sb_storage::Error) -> Self {
        match err {
            sb_storage::Error::JobNotFound(id) => EngineError::NotFound(format!("job {id}")),
            sb_storage::Error::SimNotFound { job_id, sim_id } => {
                EngineError::NotFound(format!("simulation {job_id}/{sim_id}"))
            }
            sb_storage::Error::Conflict => EngineError::Conflict("concurrent create".to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
