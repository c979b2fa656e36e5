// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::test_support::test_app_state;

use super::*;

/// Smoke test: every route in the table registers without a path conflict.
/// axum panics at `Router` build time if two routes collide, so this alone
/// catches a typo'd path segment.
#[test]
fn router_builds_without_panicking() {
    let _ = router(test_app_state());
}
