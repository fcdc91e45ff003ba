// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-call timeouts on store operations

use async_trait::async_trait;
use cj_adapters::{FieldSelector, StoreClient, StoreError, StoreOp};
use cj_core::{Job, ObjectKey, ScheduledJob};
use std::future::Future;
use std::time::Duration;

/// Store wrapper that bounds every call by a fixed timeout.
///
/// An expired call surfaces as [`StoreError::Timeout`]; the underlying
/// request is dropped.
#[derive(Clone)]
pub struct BoundedStore<S> {
    inner: S,
    timeout: Option<Duration>,
}

impl<S> BoundedStore<S> {
    /// `None` disables the timeout
    pub fn new(inner: S, timeout: Option<Duration>) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn bounded<T, F>(&self, op: StoreOp, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let Some(after) = self.timeout else {
            return call.await;
        };
        match tokio::time::timeout(after, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout { op, after }),
        }
    }
}

#[async_trait]
impl<S: StoreClient> StoreClient for BoundedStore<S> {
    async fn get_scheduled_job(&self, key: &ObjectKey) -> Result<ScheduledJob, StoreError> {
        self.bounded(StoreOp::Get, self.inner.get_scheduled_job(key))
            .await
    }

    async fn list_jobs(
        &self,
        namespace: &str,
        selector: &FieldSelector,
    ) -> Result<Vec<Job>, StoreError> {
        self.bounded(StoreOp::List, self.inner.list_jobs(namespace, selector))
            .await
    }

    async fn create_job(&self, job: &Job) -> Result<Job, StoreError> {
        self.bounded(StoreOp::Create, self.inner.create_job(job))
            .await
    }

    async fn update_status(&self, scheduled: &ScheduledJob) -> Result<ScheduledJob, StoreError> {
        self.bounded(StoreOp::UpdateStatus, self.inner.update_status(scheduled))
            .await
    }

    async fn delete_job(&self, job: &Job) -> Result<(), StoreError> {
        self.bounded(StoreOp::Delete, self.inner.delete_job(job)).await
    }
}

#[cfg(test)]
#[path = "bounded_tests.rs"]
mod tests;
