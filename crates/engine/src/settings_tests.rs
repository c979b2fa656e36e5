// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use serial_test::serial;

use super::*;

#[test]
#[serial]
fn defaults_apply_when_unset() {
    std::env::remove_var("MAX_RETRIES");
    std::env::remove_var("T_SIM_STALE_SEC");
    assert_eq!(max_retries(), 3);
    assert_eq!(t_sim_stale(), Duration::from_secs(1800));
}

#[test]
#[serial]
fn env_override_is_honored() {
    std::env::set_var("MAX_RETRIES", "7");
    assert_eq!(max_retries(), 7);
    std::env::remove_var("MAX_RETRIES");
}

#[test]
#[serial]
fn malformed_env_falls_back_to_default() {
    std::env::set_var("SIM_MAX", "not-a-number");
    assert_eq!(sim_max(), 100);
    std::env::remove_var("SIM_MAX");
}

#[test]
#[serial]
fn fixed_timeouts_are_not_env_configurable() {
    assert_eq!(worker_push_timeout(), Duration::from_secs(5));
    assert_eq!(aggregation_timeout(), Duration::from_secs(120));
}

#[test]
#[serial]
fn rate_limit_budget_scales_with_sim_max() {
    std::env::set_var("SIM_MAX", "50");
    assert_eq!(rate_limit_budget(), 200);
    std::env::remove_var("SIM_MAX");
}
