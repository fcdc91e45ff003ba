// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building child jobs from a scheduled job's template

use chrono::{DateTime, Utc};
use cj_core::{
    format_scheduled_time, set_controller_reference, ControllerConfig, Job, ObjectMeta,
    OwnerError, ScheduledJob,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("unable to set owner of job: {0}")]
    Owner(#[from] OwnerError),
}

/// Name of the job realizing the run at `scheduled_time`.
///
/// Unique per (parent, nominal run); creating the same run twice collides in
/// the store instead of producing a duplicate.
pub fn job_name(parent: &str, scheduled_time: DateTime<Utc>) -> String {
    format!("{}-{}", parent, scheduled_time.timestamp())
}

/// Build the child job for the run at `scheduled_time`.
pub fn construct_job(
    parent: &ScheduledJob,
    scheduled_time: DateTime<Utc>,
    config: &ControllerConfig,
) -> Result<Job, ConstructError> {
    let template = &parent.spec.job_template;

    let mut metadata = ObjectMeta::new(
        parent.namespace(),
        job_name(parent.name(), scheduled_time),
    );
    metadata.labels = template.labels.clone();
    metadata.annotations = template.annotations.clone();
    metadata.annotations.insert(
        config.scheduled_time_annotation.clone(),
        format_scheduled_time(scheduled_time),
    );
    set_controller_reference(parent, &mut metadata, config)?;

    Ok(Job {
        metadata,
        spec: template.spec.clone(),
        ..Job::default()
    })
}

#[cfg(test)]
#[path = "construct_tests.rs"]
mod tests;
