// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Partitioning a scheduled job's children by lifecycle state

use chrono::{DateTime, Utc};
use cj_core::{parse_scheduled_time, ControllerConfig, FinishState, Job, ScheduledTimeError};

/// Children of one scheduled job, split by finish state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub active: Vec<Job>,
    pub succeeded: Vec<Job>,
    pub failed: Vec<Job>,
    /// Latest nominal run time recorded on any child
    pub most_recent: Option<DateTime<Utc>>,
}

impl Classification {
    pub fn total(&self) -> usize {
        self.active.len() + self.succeeded.len() + self.failed.len()
    }
}

/// Nominal run time recorded on a job, `None` when the annotation is absent.
pub fn scheduled_time_of(
    job: &Job,
    config: &ControllerConfig,
) -> Result<Option<DateTime<Utc>>, ScheduledTimeError> {
    match job.metadata.annotations.get(&config.scheduled_time_annotation) {
        Some(raw) => parse_scheduled_time(raw).map(Some),
        None => Ok(None),
    }
}

/// Classify every child. A job whose annotation cannot be parsed is still
/// classified but does not count towards `most_recent`.
pub fn classify(jobs: Vec<Job>, config: &ControllerConfig) -> Classification {
    let mut out = Classification::default();

    for job in jobs {
        match scheduled_time_of(&job, config) {
            Ok(Some(t)) => {
                if out.most_recent.map_or(true, |recent| t > recent) {
                    out.most_recent = Some(t);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(
                job = %job.metadata.key(),
                error = %e,
                "unable to parse scheduled time for child job"
            ),
        }

        match job.finish_state() {
            FinishState::Running => out.active.push(job),
            FinishState::Succeeded => out.succeeded.push(job),
            FinishState::Failed => out.failed.push(job),
        }
    }

    out
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
