// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child job objects and their finish state.

use crate::meta::ObjectMeta;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API version stamped on references to child jobs.
pub const JOB_API_VERSION: &str = "batch/v1";

/// Kind stamped on references to child jobs.
pub const JOB_KIND: &str = "Job";

/// Condition types reported by the job executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobConditionType {
    Complete,
    Failed,
    Suspended,
}

/// Truth value of a condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

/// One observation reported by the job executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCondition {
    #[serde(rename = "type")]
    pub kind: JobConditionType,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobCondition {
    pub fn new(kind: JobConditionType, status: ConditionStatus) -> Self {
        Self {
            kind,
            status,
            last_transition_time: None,
            message: None,
        }
    }
}

/// Observed state of a child job, written by the executor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<JobCondition>,
}

/// Lifecycle bucket of a child job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishState {
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for FinishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishState::Running => write!(f, "running"),
            FinishState::Succeeded => write!(f, "succeeded"),
            FinishState::Failed => write!(f, "failed"),
        }
    }
}

/// A child job created from a scheduled job's template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub metadata: ObjectMeta,
    /// Opaque payload for the external executor
    #[serde(default)]
    pub spec: serde_json::Value,
    #[serde(default)]
    pub status: JobStatus,
}

impl Job {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.status.start_time
    }

    /// Finish state derived from the job's own conditions.
    ///
    /// A job is finished once it carries a `Complete` or `Failed` condition
    /// with status `True`; the first such condition wins.
    pub fn finish_state(&self) -> FinishState {
        self.status
            .conditions
            .iter()
            .filter(|c| c.status == ConditionStatus::True)
            .find_map(|c| match c.kind {
                JobConditionType::Complete => Some(FinishState::Succeeded),
                JobConditionType::Failed => Some(FinishState::Failed),
                JobConditionType::Suspended => None,
            })
            .unwrap_or(FinishState::Running)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
