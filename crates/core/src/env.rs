// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for controller configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Config file path override
pub fn config_path() -> Option<PathBuf> {
    std::env::var("CJ_CONFIG").ok().map(PathBuf::from)
}

/// Missed-run cap override
pub fn max_missed_runs() -> Option<u32> {
    std::env::var("CJ_MAX_MISSED_RUNS")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
}

/// Store call timeout override
pub fn store_timeout() -> Option<Duration> {
    std::env::var("CJ_STORE_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
