// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate, following
//! the same free-function-over-`std::env::var` convention as
//! `sb_engine::settings`.

/// HTTP bind address (default `0.0.0.0`).
pub fn bind_addr() -> String {
    std::env::var("OJ_SIM_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string())
}

/// HTTP bind port (default `8080`).
pub fn http_port() -> u16 {
    std::env::var("OJ_SIM_HTTP_PORT").ok().and_then(|s| s.parse::<u16>().ok()).unwrap_or(8080)
}

/// Base URL of the deck content collaborator (`DeckStore.resolve`'s
/// upstream). Unset means decks never resolve — fine for a dev instance
/// that only exercises the job lifecycle with a fake store.
pub fn deck_store_url() -> Option<String> {
    std::env::var("DECK_STORE_URL").ok().filter(|s| !s.is_empty())
}

/// Base URL of the structured-log collaborator (`LogStore.structured`'s
/// upstream).
pub fn log_store_url() -> Option<String> {
    std::env::var("LOG_STORE_URL").ok().filter(|s| !s.is_empty())
}

/// Base URL of the rating-read collaborator (`RatingStore.hasResultsForJob`).
pub fn rating_store_url() -> Option<String> {
    std::env::var("RATING_STORE_URL").ok().filter(|s| !s.is_empty())
}

/// Base URL of the rating-math collaborator (`RatingEngine.process`).
pub fn rating_engine_url() -> Option<String> {
    std::env::var("RATING_ENGINE_URL").ok().filter(|s| !s.is_empty())
}
