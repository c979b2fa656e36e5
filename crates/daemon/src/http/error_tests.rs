// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use axum::http::StatusCode;
use axum::response::IntoResponse;
use sb_engine::EngineError;

use super::*;

fn status_of(err: EngineError) -> StatusCode {
    ApiError(err).into_response().status()
}

#[test]
fn maps_every_engine_error_to_its_spec_status() {
    assert_eq!(status_of(EngineError::BadRequest("x".into())), StatusCode::BAD_REQUEST);
    assert_eq!(status_of(EngineError::Unauthorized), StatusCode::UNAUTHORIZED);
    assert_eq!(status_of(EngineError::Forbidden("x".into())), StatusCode::FORBIDDEN);
    assert_eq!(status_of(EngineError::NotFound("x".into())), StatusCode::NOT_FOUND);
    assert_eq!(status_of(EngineError::Conflict("x".into())), StatusCode::CONFLICT);
    assert_eq!(status_of(EngineError::RateLimited), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(status_of(EngineError::Upstream("x".into())), StatusCode::BAD_GATEWAY);
    assert_eq!(status_of(EngineError::Internal("x".into())), StatusCode::INTERNAL_SERVER_ERROR);
}
