// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::config::ControllerConfig;
use crate::id::Uid;
use crate::job::{ConditionStatus, Job, JobCondition, JobConditionType};
use crate::meta::ObjectMeta;
use crate::owner::set_controller_reference;
use crate::scheduled_job::{ConcurrencyPolicy, ScheduledJob};
use crate::time_fmt::format_scheduled_time;
use chrono::{DateTime, Utc};

pub const TEST_NAMESPACE: &str = "batch";

// ── Scheduled job builder ───────────────────────────────────────────────────

/// Builder for a persisted scheduled job (uid already assigned).
pub struct ScheduledJobBuilder {
    sj: ScheduledJob,
}

impl ScheduledJobBuilder {
    pub fn new(name: &str, schedule: &str) -> Self {
        let mut sj = ScheduledJob::default();
        sj.metadata = ObjectMeta::new(TEST_NAMESPACE, name);
        sj.metadata.uid = Uid::new(format!("uid-{}", name));
        sj.spec.schedule = schedule.to_string();
        Self { sj }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.sj.metadata.namespace = namespace.to_string();
        self
    }

    pub fn uid(mut self, uid: &str) -> Self {
        self.sj.metadata.uid = Uid::new(uid);
        self
    }

    pub fn created_at(mut self, t: DateTime<Utc>) -> Self {
        self.sj.metadata.creation_timestamp = Some(t);
        self
    }

    pub fn last_schedule_time(mut self, t: DateTime<Utc>) -> Self {
        self.sj.status.last_schedule_time = Some(t);
        self
    }

    pub fn starting_deadline_seconds(mut self, secs: u64) -> Self {
        self.sj.spec.starting_deadline_seconds = Some(secs);
        self
    }

    pub fn concurrency_policy(mut self, policy: ConcurrencyPolicy) -> Self {
        self.sj.spec.concurrency_policy = policy;
        self
    }

    pub fn suspend(mut self, suspend: bool) -> Self {
        self.sj.spec.suspend = suspend;
        self
    }

    pub fn successful_jobs_history_limit(mut self, limit: u32) -> Self {
        self.sj.spec.successful_jobs_history_limit = Some(limit);
        self
    }

    pub fn failed_jobs_history_limit(mut self, limit: u32) -> Self {
        self.sj.spec.failed_jobs_history_limit = Some(limit);
        self
    }

    pub fn template_label(mut self, key: &str, value: &str) -> Self {
        self.sj
            .spec
            .job_template
            .labels
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn template_annotation(mut self, key: &str, value: &str) -> Self {
        self.sj
            .spec
            .job_template
            .annotations
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn template_spec(mut self, spec: serde_json::Value) -> Self {
        self.sj.spec.job_template.spec = spec;
        self
    }

    pub fn build(self) -> ScheduledJob {
        self.sj
    }
}

// ── Child job builder ───────────────────────────────────────────────────────

/// Builder for a persisted child job.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(name: &str) -> Self {
        let mut job = Job::default();
        job.metadata = ObjectMeta::new(TEST_NAMESPACE, name);
        job.metadata.uid = Uid::new(format!("uid-{}", name));
        Self { job }
    }

    /// Controller-owned by `owner`, placed in its namespace.
    pub fn owned_by(mut self, owner: &ScheduledJob, config: &ControllerConfig) -> Self {
        self.job.metadata.namespace = owner.metadata.namespace.clone();
        if let Err(e) = set_controller_reference(owner, &mut self.job.metadata, config) {
            panic!("test owner reference: {e}");
        }
        self
    }

    pub fn scheduled_at(mut self, t: DateTime<Utc>, config: &ControllerConfig) -> Self {
        self.job.metadata.annotations.insert(
            config.scheduled_time_annotation.clone(),
            format_scheduled_time(t),
        );
        self
    }

    pub fn annotation(mut self, key: &str, value: &str) -> Self {
        self.job
            .metadata
            .annotations
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn started_at(mut self, t: DateTime<Utc>) -> Self {
        self.job.status.start_time = Some(t);
        self
    }

    pub fn succeeded(mut self) -> Self {
        self.job.status.conditions.push(JobCondition::new(
            JobConditionType::Complete,
            ConditionStatus::True,
        ));
        self
    }

    pub fn failed(mut self) -> Self {
        self.job.status.conditions.push(JobCondition::new(
            JobConditionType::Failed,
            ConditionStatus::True,
        ));
        self
    }

    pub fn build(self) -> Job {
        self.job
    }
}
