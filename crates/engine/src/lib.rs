// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Reconciliation engine for scheduled jobs

mod bounded;
pub mod classify;
pub mod concurrency;
pub mod construct;
mod error;
pub mod history;
mod reconciler;
pub mod schedule;

pub use bounded::BoundedStore;
pub use classify::{classify, scheduled_time_of, Classification};
pub use concurrency::{enforce, ConcurrencyDecision};
pub use construct::{construct_job, job_name, ConstructError};
pub use error::ReconcileError;
pub use history::{excess_jobs, prune_history, PruneReport};
pub use reconciler::{ReconcileOutcome, Reconciler};
pub use schedule::{is_too_late, next_schedule, CronSchedule, ScheduleError, ScheduleWindow};
