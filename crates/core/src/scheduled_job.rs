// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduled job: a cron schedule plus a template for the jobs it creates.

use crate::meta::{ObjectMeta, ObjectReference};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// How to treat a new run while earlier runs are still active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcurrencyPolicy {
    /// Runs may overlap
    #[default]
    Allow,
    /// Skip the new run while any earlier run is active
    Forbid,
    /// Delete active runs, then start the new one
    Replace,
}

impl fmt::Display for ConcurrencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyPolicy::Allow => write!(f, "Allow"),
            ConcurrencyPolicy::Forbid => write!(f, "Forbid"),
            ConcurrencyPolicy::Replace => write!(f, "Replace"),
        }
    }
}

/// Template for the child jobs of a scheduled job.
///
/// The job spec is opaque to the controller; it is copied verbatim into each
/// child and interpreted only by the external executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobTemplate {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default)]
    pub spec: serde_json::Value,
}

/// Desired state of a scheduled job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledJobSpec {
    /// Cron expression, e.g. `"*/5 * * * *"` or `"@hourly"`
    pub schedule: String,
    /// Deadline for starting a run that missed its scheduled time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_deadline_seconds: Option<u64>,
    #[serde(default)]
    pub concurrency_policy: ConcurrencyPolicy,
    /// Suspends subsequent runs; already started runs are unaffected
    #[serde(default)]
    pub suspend: bool,
    pub job_template: JobTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successful_jobs_history_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_jobs_history_limit: Option<u32>,
}

impl ScheduledJobSpec {
    pub fn starting_deadline(&self) -> Option<Duration> {
        self.starting_deadline_seconds.map(Duration::from_secs)
    }
}

/// Observed state of a scheduled job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledJobStatus {
    /// Currently unfinished child jobs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub active: Vec<ObjectReference>,
    /// Most recent nominal run time realized by a child job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_schedule_time: Option<DateTime<Utc>>,
}

/// A scheduled job as persisted in the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledJob {
    pub metadata: ObjectMeta,
    pub spec: ScheduledJobSpec,
    #[serde(default)]
    pub status: ScheduledJobStatus,
}

impl ScheduledJob {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    /// Earliest time from which runs may be considered missed: the last
    /// scheduled run if any, else the object's creation time.
    pub fn schedule_bound(&self) -> Option<DateTime<Utc>> {
        self.status
            .last_schedule_time
            .or(self.metadata.creation_timestamp)
    }
}

#[cfg(test)]
#[path = "scheduled_job_tests.rs"]
mod tests;
