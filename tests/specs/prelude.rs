//! Test helpers for behavioral specifications.
//!
//! `World` plays the delivery layer: it owns the store and the clock and
//! invokes the reconciler the way a work queue would.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use chrono::{DateTime, Utc};
use cj_adapters::{FakeStore, StoreOp};
use cj_core::test_support::ScheduledJobBuilder;
use cj_core::{
    parse_scheduled_time, Clock, ConditionStatus, ControllerConfig, FakeClock, JobCondition,
    JobConditionType, ScheduledJob, ScheduledJobStatus,
};
use cj_engine::{job_name, ReconcileError, Reconciler};
use std::time::Duration;

pub use cj_core::{ConcurrencyPolicy, ObjectKey};
pub use cj_engine::ReconcileOutcome;

/// Parse an RFC 3339 instant
pub fn t(s: &str) -> DateTime<Utc> {
    parse_scheduled_time(s).unwrap()
}

/// Name of the child for `parent`'s run at `at`
pub fn run_name(parent: &str, at: &str) -> String {
    job_name(parent, t(at))
}

pub fn secs(n: u64) -> ReconcileOutcome {
    ReconcileOutcome::RequeueAfter(Duration::from_secs(n))
}

pub struct World {
    pub store: FakeStore,
    pub clock: FakeClock,
    pub config: ControllerConfig,
    reconciler: Reconciler<FakeStore, FakeClock>,
}

impl World {
    pub fn at(now: &str) -> Self {
        Self::with_config(now, ControllerConfig::default())
    }

    pub fn with_config(now: &str, config: ControllerConfig) -> Self {
        let clock = FakeClock::at(t(now));
        let store = FakeStore::with_clock(clock.clone());
        store.register_owner_index(&config);
        let reconciler = Reconciler::new(store.clone(), clock.clone(), config.clone());
        Self {
            store,
            clock,
            config,
            reconciler,
        }
    }

    /// Start a scheduled job builder, created at the current time
    pub fn scheduled(&self, name: &str, schedule: &str) -> ScheduledJobBuilder {
        ScheduledJobBuilder::new(name, schedule).created_at(self.clock.now())
    }

    /// Persist a scheduled job, returning its key
    pub fn apply(&self, sj: ScheduledJob) -> ObjectKey {
        let key = sj.metadata.key();
        self.store.put_scheduled_job(sj);
        key
    }

    pub async fn reconcile(&self, key: &ObjectKey) -> ReconcileOutcome {
        self.reconciler.reconcile(key).await.unwrap()
    }

    pub async fn try_reconcile(&self, key: &ObjectKey) -> Result<ReconcileOutcome, ReconcileError> {
        self.reconciler.reconcile(key).await
    }

    /// Sleep for the requested delay, then reconcile again
    pub async fn follow(&self, key: &ObjectKey, outcome: ReconcileOutcome) -> ReconcileOutcome {
        let delay = outcome
            .requeue_after()
            .unwrap_or_else(|| panic!("expected a requeue, got {outcome:?}"));
        self.clock.advance(delay);
        self.reconcile(key).await
    }

    pub fn advance(&self, secs: u64) {
        self.clock.advance(Duration::from_secs(secs));
    }

    /// Simulate a controller restart: fresh reconciler, same store and clock
    pub fn restart(&mut self) {
        self.reconciler =
            Reconciler::new(self.store.clone(), self.clock.clone(), self.config.clone());
    }

    pub fn job_names(&self) -> Vec<String> {
        self.store.job_names()
    }

    pub fn status(&self, key: &ObjectKey) -> ScheduledJobStatus {
        self.store.scheduled_job(key).unwrap().status
    }

    pub fn active_names(&self, key: &ObjectKey) -> Vec<String> {
        self.status(key)
            .active
            .into_iter()
            .map(|r| r.name)
            .collect()
    }

    /// Executor side: mark a job started now
    pub fn start(&self, name: &str) {
        let now = self.clock.now();
        self.store.update_job(&ObjectKey::new("batch", name), |job| {
            job.status.start_time = Some(now);
        });
    }

    /// Executor side: finish a job
    pub fn finish(&self, name: &str, succeeded: bool) {
        let kind = if succeeded {
            JobConditionType::Complete
        } else {
            JobConditionType::Failed
        };
        let now = self.clock.now();
        self.store.update_job(&ObjectKey::new("batch", name), |job| {
            job.status.completion_time = Some(now);
            job.status
                .conditions
                .push(JobCondition::new(kind, ConditionStatus::True));
        });
    }

    pub fn creates(&self) -> usize {
        self.store.calls_of(StoreOp::Create).len()
    }

    pub fn deletes(&self) -> usize {
        self.store.calls_of(StoreOp::Delete).len()
    }
}
