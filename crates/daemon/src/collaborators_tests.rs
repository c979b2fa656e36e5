// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn unconfigured_deck_store_rejects_with_bad_request() {
    let store = HttpDeckStore::new(None);
    let err = store.resolve("deck-1").await.unwrap_err();
    assert!(matches!(err, EngineError::BadRequest(_)));
}

#[tokio::test]
async fn unconfigured_log_store_returns_no_games() {
    let store = HttpLogStore::new(None);
    let games = store.structured("job-1", &["a".to_string()]).await.unwrap();
    assert!(games.is_empty());
}

#[tokio::test]
async fn unconfigured_rating_store_reports_unrated() {
    let store = HttpRatingStore::new(None);
    assert!(!store.has_results_for_job("job-1").await.unwrap());
}

#[tokio::test]
async fn unconfigured_rating_engine_is_a_noop() {
    let engine = HttpRatingEngine::new(None);
    let deck_ids = ["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
    engine.process("job-1", &deck_ids, &[]).await.unwrap();
}
