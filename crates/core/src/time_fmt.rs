// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timestamp and duration formatting.
//!
//! The scheduled-time annotation is the only durable record of which nominal
//! run produced a child job, so its text format is fixed: RFC 3339 with whole
//! seconds and a `Z` suffix (`2026-01-01T00:05:00Z`). Parsing accepts any
//! RFC 3339 offset and normalizes to UTC.

use chrono::{DateTime, SecondsFormat, Utc};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scheduled time {value:?}: {reason}")]
pub struct ScheduledTimeError {
    pub value: String,
    pub reason: String,
}

/// Format a nominal run time for the scheduled-time annotation.
pub fn format_scheduled_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a scheduled-time annotation value.
pub fn parse_scheduled_time(value: &str) -> Result<DateTime<Utc>, ScheduledTimeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ScheduledTimeError {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// Format seconds as a short human-readable duration: `"5s"`, `"2m"`, `"1h30m"`, `"3d"`.
///
/// For the hours range, minutes are included when non-zero (e.g. `"1h"` vs `"1h5m"`).
pub fn format_elapsed(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        let h = secs / 3600;
        let m = (secs % 3600) / 60;
        if m > 0 {
            format!("{}h{}m", h, m)
        } else {
            format!("{}h", h)
        }
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Convenience wrapper around [`format_elapsed`] for requeue delays.
pub fn format_duration(d: Duration) -> String {
    format_elapsed(d.as_secs())
}

#[cfg(test)]
#[path = "time_fmt_tests.rs"]
mod tests;
