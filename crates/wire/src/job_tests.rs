// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use sb_core::{Job, JobId, JobStatus};

use super::*;

#[test]
fn from_job_uses_the_given_effective_status_not_the_stored_one() {
    let mut job = Job::test_fixture(JobId::new(), 2);
    job.status = JobStatus::Running;
    job.completed_sim_count = 2;

    let view = JobView::from_job(&job, JobStatus::Completed);

    assert_eq!(view.status, JobStatus::Completed);
    assert_eq!(view.id, job.id.to_string());
    assert_eq!(view.deck_names, vec!["deck-a", "deck-b", "deck-c", "deck-d"]);
    assert_eq!(view.total_sim_count, 2);
}

#[test]
fn serializes_to_camel_case_field_names() {
    let job = Job::test_fixture(JobId::new(), 1);
    let view = JobView::from_job(&job, job.status);
    let value = serde_json::to_value(&view).unwrap();
    assert!(value.get("totalSimCount").is_some());
    assert!(value.get("completedSimCount").is_some());
    assert!(value.get("createdAtMs").is_some());
    assert!(value.get("total_sim_count").is_none());
}

#[test]
fn omits_unset_optional_fields() {
    let job = Job::test_fixture(JobId::new(), 1);
    let view = JobView::from_job(&job, job.status);
    let value = serde_json::to_value(&view).unwrap();
    assert!(value.get("workerId").is_none());
    assert!(value.get("startedAtMs").is_none());
}
