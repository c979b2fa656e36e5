// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure, side-effect-free transition predicates for sim and job states.
//!
//! Nothing here touches storage or the clock. Illegal input simply
//! returns `false` — there is no error type to plumb through.

use serde::{Deserialize, Serialize};

/// State of a single simulation (one container execution).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

crate::simple_display! {
    SimState {
        Pending => "pending",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Returns `true` iff `state` is terminal (no further transitions allowed).
pub fn is_terminal_sim(state: SimState) -> bool {
    matches!(state, SimState::Completed | SimState::Cancelled)
}

/// Returns `true` iff `from -> to` is a legal sim transition.
///
/// `FAILED -> PENDING` is legal: it models redelivery of a task whose
/// previous attempt failed, so the worker pool can retry it.
pub fn can_sim_transition(from: SimState, to: SimState) -> bool {
    use SimState::*;
    matches!(
        (from, to),
        (Pending, Running)
            | (Pending, Cancelled)
            | (Running, Completed)
            | (Running, Failed)
            | (Running, Cancelled)
            | (Failed, Pending)
    )
}

/// Status of a job (batch of simulations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Completed => "completed",
        Failed => "failed",
        Cancelled => "cancelled",
    }
}

/// Returns `true` iff `status` is terminal.
pub fn is_terminal_job(status: JobStatus) -> bool {
    matches!(status, JobStatus::Completed | JobStatus::Cancelled)
}

/// Returns `true` iff `from -> to` is a legal job transition.
pub fn can_job_transition(from: JobStatus, to: JobStatus) -> bool {
    use JobStatus::*;
    matches!(
        (from, to),
        (Queued, Running)
            | (Queued, Cancelled)
            | (Queued, Failed)
            | (Running, Completed)
            | (Running, Failed)
            | (Running, Cancelled)
            | (Failed, Queued)
            | (Failed, Cancelled)
    )
}

#[cfg(test)]
#[path = "state_machine_tests.rs"]
mod tests;
