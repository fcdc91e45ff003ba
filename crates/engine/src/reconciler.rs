// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The reconcile loop for one scheduled job.
//!
//! Each invocation re-derives everything from the store: it lists the
//! children, rewrites the status from them, prunes history, and starts at
//! most one run. Nothing carries over between invocations, so a reconcile
//! can be repeated or replayed after a crash. Duplicate creation is prevented
//! by the deterministic child name, not by locking.

use crate::bounded::BoundedStore;
use crate::classify::classify;
use crate::concurrency::{enforce, ConcurrencyDecision};
use crate::construct::construct_job;
use crate::error::ReconcileError;
use crate::history::prune_history;
use crate::schedule::{is_too_late, next_schedule, CronSchedule};
use chrono::{DateTime, Utc};
use cj_adapters::{FieldSelector, StoreClient, TracedStore};
use cj_core::{
    format_duration, job_reference, Clock, ControllerConfig, Job, ObjectKey, ScheduledJob,
    ScheduledJobStatus,
};
use std::time::Duration;
use tracing::Instrument;

/// What the caller should do after a reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Reconcile again after the delay (the next nominal run)
    RequeueAfter(Duration),
    /// Wait for the object to change
    NoRequeue,
}

impl ReconcileOutcome {
    pub fn requeue_after(&self) -> Option<Duration> {
        match self {
            ReconcileOutcome::RequeueAfter(d) => Some(*d),
            ReconcileOutcome::NoRequeue => None,
        }
    }
}

/// Reconciler for scheduled jobs.
///
/// Assumes the caller never runs two reconciles of the same object at once.
pub struct Reconciler<S, C: Clock> {
    store: TracedStore<BoundedStore<S>>,
    clock: C,
    config: ControllerConfig,
}

impl<S, C> Reconciler<S, C>
where
    S: StoreClient,
    C: Clock,
{
    pub fn new(store: S, clock: C, config: ControllerConfig) -> Self {
        let timeout = config.store_timeout();
        Self {
            store: TracedStore::new(BoundedStore::new(store, timeout)),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Reconcile the scheduled job at `key`.
    pub async fn reconcile(&self, key: &ObjectKey) -> Result<ReconcileOutcome, ReconcileError> {
        self.reconcile_inner(key)
            .instrument(tracing::info_span!("reconcile", scheduled_job = %key))
            .await
    }

    async fn reconcile_inner(&self, key: &ObjectKey) -> Result<ReconcileOutcome, ReconcileError> {
        let mut scheduled = match self.store.get_scheduled_job(key).await {
            Ok(sj) => sj,
            Err(e) if e.is_not_found() => {
                tracing::debug!("scheduled job no longer exists");
                return Ok(ReconcileOutcome::NoRequeue);
            }
            Err(source) => {
                return Err(ReconcileError::Fetch {
                    key: key.clone(),
                    source,
                })
            }
        };

        let selector = FieldSelector::new(self.config.owner_index_key.clone(), scheduled.name());
        let children = self
            .store
            .list_jobs(scheduled.namespace(), &selector)
            .await
            .map_err(|source| ReconcileError::List {
                key: key.clone(),
                source,
            })?;

        let classes = classify(children, &self.config);
        let mut active = Vec::with_capacity(classes.active.len());
        for job in &classes.active {
            match job_reference(job) {
                Ok(reference) => active.push(reference),
                Err(e) => tracing::warn!(
                    job = %job.metadata.key(),
                    error = %e,
                    "unable to make reference to active job"
                ),
            }
        }
        // Pruned children take their annotation with them, so the recorded
        // time only moves forward
        let last_schedule_time = classes.most_recent.max(scheduled.status.last_schedule_time);
        scheduled.status = ScheduledJobStatus {
            active,
            last_schedule_time,
        };
        tracing::debug!(
            active = classes.active.len(),
            successful = classes.succeeded.len(),
            failed = classes.failed.len(),
            "job count"
        );

        self.store
            .update_status(&scheduled)
            .await
            .map_err(|source| ReconcileError::UpdateStatus {
                key: key.clone(),
                source,
            })?;

        let spec = &scheduled.spec;
        prune_history(
            &self.store,
            classes.failed,
            spec.failed_jobs_history_limit,
            "failed",
        )
        .await;
        prune_history(
            &self.store,
            classes.succeeded,
            spec.successful_jobs_history_limit,
            "succeeded",
        )
        .await;

        if spec.suspend {
            tracing::debug!("scheduled job suspended, skipping");
            return Ok(ReconcileOutcome::NoRequeue);
        }

        let now = self.clock.now();
        let window = match CronSchedule::parse(&spec.schedule).and_then(|schedule| {
            next_schedule(
                &schedule,
                scheduled.schedule_bound().unwrap_or(now),
                spec.starting_deadline(),
                now,
                self.config.max_missed_runs,
            )
        }) {
            Ok(window) => window,
            Err(e) => {
                tracing::error!(error = %e, "unable to figure out schedule");
                return Ok(ReconcileOutcome::NoRequeue);
            }
        };

        let requeue = window.until_next(now);
        let Some(missed_run) = window.missed_run else {
            tracing::debug!(
                next_run = %window.next_run,
                requeue = %format_duration(requeue),
                "no upcoming scheduled times, sleeping until next"
            );
            return Ok(ReconcileOutcome::RequeueAfter(requeue));
        };

        let span = tracing::debug_span!(
            "run",
            current_run = %missed_run,
            next_run = %window.next_run,
        );
        self.start_run(&scheduled, &classes.active, missed_run, now, requeue)
            .instrument(span)
            .await
    }

    /// Start the run due at `missed_run`, subject to its deadline and the
    /// concurrency policy.
    async fn start_run(
        &self,
        scheduled: &ScheduledJob,
        active: &[Job],
        missed_run: DateTime<Utc>,
        now: DateTime<Utc>,
        requeue: Duration,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let spec = &scheduled.spec;
        let next = ReconcileOutcome::RequeueAfter(requeue);

        if is_too_late(missed_run, spec.starting_deadline(), now) {
            tracing::debug!(
                requeue = %format_duration(requeue),
                "missed starting deadline for last run, sleeping till next"
            );
            return Ok(next);
        }

        if enforce(&self.store, spec.concurrency_policy, active).await?
            == ConcurrencyDecision::Skip
        {
            return Ok(next);
        }

        let job = match construct_job(scheduled, missed_run, &self.config) {
            Ok(job) => job,
            Err(e) => {
                tracing::error!(error = %e, "unable to construct job from template");
                return Ok(next);
            }
        };

        match self.store.create_job(&job).await {
            Ok(created) => tracing::debug!(job = %created.metadata.key(), "created job for run"),
            Err(e) if e.is_already_exists() => {
                tracing::debug!(job = %job.metadata.key(), "job for run already exists")
            }
            Err(source) => {
                return Err(ReconcileError::Create {
                    job: job.metadata.key(),
                    source,
                })
            }
        }

        tracing::debug!(requeue = %format_duration(requeue), "sleeping until next run");
        Ok(next)
    }
}

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;
