// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("tst-");
}

#[test]
fn define_id_hash_map_lookup() {
    let id = TestId::new();
    let key = id.as_str().to_string();
    let mut map = HashMap::new();
    map.insert(id, 42);
    assert_eq!(map.get(key.as_str()), Some(&42));
}

#[test]
fn define_id_new_ids_are_unique() {
    assert_ne!(TestId::new(), TestId::new());
}

#[test]
fn define_id_roundtrips_through_string() {
    let id = TestId::new();
    let parsed = TestId::from_string(id.as_str());
    assert_eq!(id, parsed);
}

#[test]
fn define_id_suffix_strips_prefix() {
    let id = TestId::from_string("tst-abc123");
    assert_eq!(id.suffix(), "abc123");
}

#[test]
fn define_id_short_truncates_suffix() {
    let id = TestId::from_string("tst-abcdefghijklmnop");
    assert_eq!(id.short(8), "abcdefgh");
}

#[test]
fn define_id_short_returns_full_when_shorter() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id.short(8), "abc");
}

#[test]
fn define_id_display_includes_prefix() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id.to_string(), "tst-abc");
}

#[test]
fn define_id_partial_eq_str() {
    let id = TestId::from_string("tst-abc");
    assert_eq!(id, "tst-abc");
    assert_eq!(id, "tst-abc");
}

// --- short() free function tests ---

#[test]
fn short_fn_on_str() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}

#[test]
fn idbuf_is_empty_when_default() {
    assert!(IdBuf::empty().is_empty());
    assert!(!IdBuf::new("x").is_empty());
}
