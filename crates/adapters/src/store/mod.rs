// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative store client
//!
//! The store persists scheduled jobs and their child jobs. The controller
//! only reads specs, lists children through the owner index, writes status,
//! and creates or deletes child jobs.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStore, StoreCall};

use async_trait::async_trait;
use cj_core::{Job, ObjectKey, ScheduledJob};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },
    #[error("{kind} {key} already exists")]
    AlreadyExists { kind: &'static str, key: String },
    #[error("conflict updating {key}: {reason}")]
    Conflict { key: String, reason: String },
    #[error("{op} timed out after {after:?}")]
    Timeout { op: StoreOp, after: Duration },
    #[error("store error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

/// Store operation, used for timeouts and fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Get,
    List,
    Create,
    UpdateStatus,
    Delete,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOp::Get => write!(f, "get"),
            StoreOp::List => write!(f, "list"),
            StoreOp::Create => write!(f, "create"),
            StoreOp::UpdateStatus => write!(f, "update_status"),
            StoreOp::Delete => write!(f, "delete"),
        }
    }
}

/// Equality selector on a registered field index, e.g. owner name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSelector {
    pub key: String,
    pub value: String,
}

impl FieldSelector {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Client for the declarative object store
#[async_trait]
pub trait StoreClient: Clone + Send + Sync + 'static {
    /// Fetch a scheduled job by identity
    async fn get_scheduled_job(&self, key: &ObjectKey) -> Result<ScheduledJob, StoreError>;

    /// List child jobs in a namespace matching an indexed field
    async fn list_jobs(
        &self,
        namespace: &str,
        selector: &FieldSelector,
    ) -> Result<Vec<Job>, StoreError>;

    /// Create a child job, returning it as persisted (uid and creation time set)
    async fn create_job(&self, job: &Job) -> Result<Job, StoreError>;

    /// Replace the status of a scheduled job
    async fn update_status(&self, scheduled: &ScheduledJob) -> Result<ScheduledJob, StoreError>;

    /// Delete a child job. The store removes the job at once and collects its
    /// dependents in the background.
    async fn delete_job(&self, job: &Job) -> Result<(), StoreError>;
}
