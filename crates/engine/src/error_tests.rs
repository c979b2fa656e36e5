// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn storage_job_not_found_maps_to_not_found() {
    let err: EngineError = sb_storage::Error::JobNotFound("job-abc".to_string()).into();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[test]
fn storage_conflict_maps_to_conflict() {
    let err: EngineError = sb_storage::Error::Conflict.into();
    assert!(matches!(err, EngineError::Conflict(_)));
}
