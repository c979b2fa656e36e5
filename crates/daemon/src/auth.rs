// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves a `Caller` from the request, as handed down by the (external,
//! out-of-scope per spec.md §1) auth layer. This crate trusts whatever
//! identity arrives via `X-Caller-Id`/`X-Caller-Role` — verifying tokens or
//! sessions is the auth layer's job, not this one's.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use sb_core::{Caller, Role};

const CALLER_ID_HEADER: &str = "x-caller-id";
const CALLER_ROLE_HEADER: &str = "x-caller-role";

/// Extractor wrapper so `Caller` can be pulled straight into a handler
/// signature: `async fn handler(caller: CallerExt, ...)`.
pub struct CallerExt(pub Caller);

impl<S: Send + Sync> FromRequestParts<S> for CallerExt {
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(CALLER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "missing X-Caller-Id"))?
            .to_string();
        let role = match parts.headers.get(CALLER_ROLE_HEADER).and_then(|v| v.to_str().ok()) {
            Some("worker") => Role::Worker,
            Some("admin") => Role::Admin,
            Some("user") | None => Role::User,
            Some(_) => return Err((StatusCode::UNAUTHORIZED, "unrecognized X-Caller-Role")),
        };
        Ok(CallerExt(Caller::new(id, role)))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
