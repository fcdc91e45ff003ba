// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::store::{FieldSelector, StoreClient, StoreError};
use async_trait::async_trait;
use cj_core::{Job, ObjectKey, ScheduledJob};
use tracing::Instrument;

/// Wrapper that adds tracing to any StoreClient
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StoreClient> StoreClient for TracedStore<S> {
    async fn get_scheduled_job(&self, key: &ObjectKey) -> Result<ScheduledJob, StoreError> {
        let result = self.inner.get_scheduled_job(key).await;
        match &result {
            Ok(_) => tracing::trace!(%key, "fetched"),
            Err(e) if e.is_not_found() => tracing::debug!(%key, "not found"),
            Err(e) => tracing::error!(%key, error = %e, "get failed"),
        }
        result
    }

    async fn list_jobs(
        &self,
        namespace: &str,
        selector: &FieldSelector,
    ) -> Result<Vec<Job>, StoreError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.list_jobs(namespace, selector).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(jobs) => tracing::debug!(count = jobs.len(), elapsed_ms, "listed"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "list failed"),
            }
            result
        }
        .instrument(tracing::debug_span!("store.list", namespace, %selector))
        .await
    }

    async fn create_job(&self, job: &Job) -> Result<Job, StoreError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.create_job(job).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(created) => tracing::info!(uid = %created.metadata.uid, elapsed_ms, "job created"),
                Err(e) if e.is_already_exists() => tracing::debug!(elapsed_ms, "already exists"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "create failed"),
            }
            result
        }
        .instrument(tracing::info_span!("store.create", job = %job.metadata.key()))
        .await
    }

    async fn update_status(&self, scheduled: &ScheduledJob) -> Result<ScheduledJob, StoreError> {
        let key = scheduled.metadata.key();
        let result = self.inner.update_status(scheduled).await;
        match &result {
            Ok(_) => tracing::debug!(
                %key,
                active = scheduled.status.active.len(),
                "status updated"
            ),
            Err(e) => tracing::error!(%key, error = %e, "status update failed"),
        }
        result
    }

    async fn delete_job(&self, job: &Job) -> Result<(), StoreError> {
        let result = self.inner.delete_job(job).await;
        tracing::info_span!("store.delete", job = %job.metadata.key()).in_scope(|| match &result {
            Ok(()) => tracing::info!("deleted"),
            Err(e) => tracing::warn!(error = %e, "delete failed (may be expected)"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
