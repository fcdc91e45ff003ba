// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule calculation: which run (if any) is due now, and when the next
//! one falls.
//!
//! Expressions use the standard five-field cron syntax
//! (`minute hour day-of-month month day-of-week`, day-of-week 0-7 with 0 and
//! 7 both Sunday) or one of the `@yearly`, `@monthly`, `@weekly`, `@daily`,
//! `@hourly` descriptors. All times are UTC. When day-of-month and
//! day-of-week are both restricted, a day matching either one fires.

use chrono::{DateTime, Utc};
use std::fmt;
use std::iter::Peekable;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("unparseable schedule {expr:?}: {reason}")]
    Parse { expr: String, reason: String },
    #[error(
        "too many missed start times (> {limit}); set or decrease \
         starting_deadline_seconds or check clock skew"
    )]
    TooManyMissedRuns { limit: u32 },
    #[error("schedule {expr:?} has no run after {after}")]
    NoUpcomingRun { expr: String, after: DateTime<Utc> },
}

/// A parsed cron schedule.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expr: String,
    inner: cron::Schedule,
    /// Day-of-week half of the expression, when both day fields are
    /// restricted and `inner` holds the day-of-month half
    by_weekday: Option<cron::Schedule>,
}

impl CronSchedule {
    pub fn parse(expr: &str) -> Result<Self, ScheduleError> {
        let (normalized, by_weekday) = normalize(expr)?;
        let compile = |normalized: &str| {
            cron::Schedule::from_str(normalized).map_err(|e| ScheduleError::Parse {
                expr: expr.to_string(),
                reason: e.to_string(),
            })
        };
        Ok(Self {
            expr: expr.to_string(),
            inner: compile(&normalized)?,
            by_weekday: by_weekday.as_deref().map(compile).transpose()?,
        })
    }

    /// First occurrence strictly after `t`.
    pub fn next_after(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.after(t).next()
    }

    /// Occurrences strictly after `t`, in order.
    fn after(&self, t: DateTime<Utc>) -> Box<dyn Iterator<Item = DateTime<Utc>> + '_> {
        match &self.by_weekday {
            None => Box::new(self.inner.after(&t)),
            Some(by_weekday) => Box::new(Union {
                a: self.inner.after(&t).peekable(),
                b: by_weekday.after(&t).peekable(),
            }),
        }
    }

    fn next_after_or_err(&self, t: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
        self.next_after(t).ok_or_else(|| ScheduleError::NoUpcomingRun {
            expr: self.expr.clone(),
            after: t,
        })
    }
}

/// Ordered merge of two ascending occurrence streams, without duplicates.
struct Union<A: Iterator, B: Iterator> {
    a: Peekable<A>,
    b: Peekable<B>,
}

impl<A, B> Iterator for Union<A, B>
where
    A: Iterator<Item = DateTime<Utc>>,
    B: Iterator<Item = DateTime<Utc>>,
{
    type Item = DateTime<Utc>;

    fn next(&mut self) -> Option<DateTime<Utc>> {
        match (self.a.peek().copied(), self.b.peek().copied()) {
            (Some(a), Some(b)) if a < b => self.a.next(),
            (Some(a), Some(b)) if b < a => self.b.next(),
            (Some(_), Some(_)) => {
                self.b.next();
                self.a.next()
            }
            (Some(_), None) => self.a.next(),
            (None, _) => self.b.next(),
        }
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Result of a schedule calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleWindow {
    /// Most recent occurrence in `(earliest, now]`
    pub missed_run: Option<DateTime<Utc>>,
    /// First occurrence strictly after `now`
    pub next_run: DateTime<Utc>,
}

impl ScheduleWindow {
    /// Time from `now` until the next run.
    pub fn until_next(&self, now: DateTime<Utc>) -> Duration {
        (self.next_run - now).to_std().unwrap_or(Duration::ZERO)
    }
}

/// Compute the latest missed run and the next run.
///
/// `bound` is the last scheduled run (or the object's creation time). With a
/// starting deadline, nothing older than `now - deadline` is considered.
/// Enumeration stops with [`ScheduleError::TooManyMissedRuns`] once more than
/// `max_missed` occurrences fall in the window, so a long outage or a skewed
/// clock never turns into an unbounded catch-up.
pub fn next_schedule(
    schedule: &CronSchedule,
    bound: DateTime<Utc>,
    deadline: Option<Duration>,
    now: DateTime<Utc>,
    max_missed: u32,
) -> Result<ScheduleWindow, ScheduleError> {
    let mut earliest = bound;
    if let Some(scheduling_deadline) = deadline.and_then(|d| checked_sub(now, d)) {
        if scheduling_deadline > earliest {
            earliest = scheduling_deadline;
        }
    }

    let next_run = schedule.next_after_or_err(now)?;
    if earliest > now {
        return Ok(ScheduleWindow {
            missed_run: None,
            next_run,
        });
    }

    let mut missed_run = None;
    let mut starts: u32 = 0;
    for t in schedule.after(earliest) {
        if t > now {
            break;
        }
        missed_run = Some(t);
        starts += 1;
        if starts > max_missed {
            return Err(ScheduleError::TooManyMissedRuns { limit: max_missed });
        }
    }

    Ok(ScheduleWindow {
        missed_run,
        next_run,
    })
}

/// Whether a run scheduled at `scheduled` is past its starting deadline.
pub fn is_too_late(scheduled: DateTime<Utc>, deadline: Option<Duration>, now: DateTime<Utc>) -> bool {
    let Some(deadline) = deadline else {
        return false;
    };
    match chrono::Duration::from_std(deadline)
        .ok()
        .and_then(|d| scheduled.checked_add_signed(d))
    {
        Some(latest_start) => latest_start < now,
        None => false,
    }
}

fn checked_sub(t: DateTime<Utc>, d: Duration) -> Option<DateTime<Utc>> {
    chrono::Duration::from_std(d)
        .ok()
        .and_then(|d| t.checked_sub_signed(d))
}

/// Rewrite a standard expression into the seconds-first form the `cron`
/// crate parses.
///
/// The `cron` crate requires both day fields to match, so an expression that
/// restricts both is split in two: the day-of-month half is returned first
/// and the day-of-week half second.
fn normalize(expr: &str) -> Result<(String, Option<String>), ScheduleError> {
    let trimmed = expr.trim();
    let parse_err = |reason: String| ScheduleError::Parse {
        expr: expr.to_string(),
        reason,
    };

    if let Some(descriptor) = trimmed.strip_prefix('@') {
        let fields = match descriptor.to_ascii_lowercase().as_str() {
            "yearly" | "annually" => "0 0 0 1 1 *",
            "monthly" => "0 0 0 1 * *",
            "weekly" => "0 0 0 * * 1",
            "daily" | "midnight" => "0 0 0 * * *",
            "hourly" => "0 0 * * * *",
            _ => return Err(parse_err(format!("unrecognized descriptor @{}", descriptor))),
        };
        return Ok((fields.to_string(), None));
    }

    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    let [minute, hour, dom, month, dow] = fields.as_slice() else {
        return Err(parse_err(format!(
            "expected exactly 5 fields, found {}",
            fields.len()
        )));
    };
    let dow = translate_day_of_week(dow).map_err(parse_err)?;
    let with_days =
        |dom: &str, dow: &str| format!("0 {} {} {} {} {}", minute, hour, dom, month, dow);

    if is_restricted(dom) && is_restricted(&dow) {
        Ok((with_days(dom, "*"), Some(with_days("*", &dow))))
    } else {
        Ok((with_days(dom, &dow), None))
    }
}

/// A day field restricts unless one of its items starts with `*` or `?`.
fn is_restricted(field: &str) -> bool {
    !field
        .split(',')
        .any(|item| item.starts_with('*') || item.starts_with('?'))
}

/// Map standard day-of-week numbers (0-7, Sunday = 0 or 7) onto the `cron`
/// crate's 1-7 (Sunday = 1). Names pass through unchanged.
fn translate_day_of_week(field: &str) -> Result<String, String> {
    let mut items = Vec::new();
    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };
        let suffix = step.map(|s| format!("/{}", s)).unwrap_or_default();

        let translated = match base.split_once('-') {
            _ if base == "*" || base == "?" => base.to_string(),
            Some((start, end)) => match (day_number(start)?, day_number(end)?) {
                (Some(s), Some(7)) if step.is_none() && s > 0 => {
                    // Wraps past Saturday onto Sunday
                    items.push("1".to_string());
                    format!("{}-7", s + 1)
                }
                (Some(s), Some(e)) => format!("{}-{}", shift_day(s), shift_day(e.min(6))),
                _ => base.to_string(),
            },
            None => match day_number(base)? {
                Some(d) => shift_day(d).to_string(),
                None => base.to_string(),
            },
        };
        items.push(format!("{}{}", translated, suffix));
    }
    Ok(items.join(","))
}

fn day_number(s: &str) -> Result<Option<u32>, String> {
    if !s.chars().all(|c| c.is_ascii_digit()) || s.is_empty() {
        return Ok(None);
    }
    let n: u32 = s.parse().map_err(|_| format!("invalid day of week {:?}", s))?;
    if n > 7 {
        return Err(format!("day of week {} out of range 0-7", n));
    }
    Ok(Some(n))
}

fn shift_day(d: u32) -> u32 {
    if d == 7 {
        1
    } else {
        d + 1
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
