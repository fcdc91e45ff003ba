// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake in-memory store for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{FieldSelector, StoreClient, StoreError, StoreOp};
use async_trait::async_trait;
use cj_core::{
    owner_index_value, Clock, ControllerConfig, FakeClock, Job, ObjectKey, ScheduledJob, Uid,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Get {
        key: ObjectKey,
    },
    List {
        namespace: String,
        selector: FieldSelector,
    },
    Create {
        key: ObjectKey,
    },
    UpdateStatus {
        key: ObjectKey,
    },
    Delete {
        key: ObjectKey,
    },
}

impl StoreCall {
    pub fn op(&self) -> StoreOp {
        match self {
            StoreCall::Get { .. } => StoreOp::Get,
            StoreCall::List { .. } => StoreOp::List,
            StoreCall::Create { .. } => StoreOp::Create,
            StoreCall::UpdateStatus { .. } => StoreOp::UpdateStatus,
            StoreCall::Delete { .. } => StoreOp::Delete,
        }
    }
}

/// Queued failure for the next matching call
struct Injected {
    /// Only fail calls on this object name
    name: Option<String>,
    error: StoreError,
}

struct FakeStoreState {
    scheduled_jobs: BTreeMap<ObjectKey, ScheduledJob>,
    jobs: BTreeMap<ObjectKey, Job>,
    /// Registered field indexes, keyed by index name
    indexes: HashMap<String, ControllerConfig>,
    failures: HashMap<StoreOp, VecDeque<Injected>>,
    calls: Vec<StoreCall>,
}

impl FakeStoreState {
    fn take_failure(&mut self, op: StoreOp, name: &str) -> Option<StoreError> {
        let queue = self.failures.get_mut(&op)?;
        let pos = queue
            .iter()
            .position(|f| f.name.as_deref().map_or(true, |n| n == name))?;
        queue.remove(pos).map(|f| f.error)
    }
}

/// Fake store adapter for testing
///
/// Assigns uids and creation timestamps on create, and answers owner-index
/// queries with the same index function the controller registers in
/// production.
#[derive(Clone)]
pub struct FakeStore {
    inner: Arc<Mutex<FakeStoreState>>,
    clock: FakeClock,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::with_clock(FakeClock::new())
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp creation timestamps from `clock`
    pub fn with_clock(clock: FakeClock) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeStoreState {
                scheduled_jobs: BTreeMap::new(),
                jobs: BTreeMap::new(),
                indexes: HashMap::new(),
                failures: HashMap::new(),
                calls: Vec::new(),
            })),
            clock,
        }
    }

    /// Register the owner index under `config.owner_index_key`
    pub fn register_owner_index(&self, config: &ControllerConfig) {
        self.inner
            .lock()
            .indexes
            .insert(config.owner_index_key.clone(), config.clone());
    }

    /// Insert or replace a scheduled job as-is
    pub fn put_scheduled_job(&self, scheduled: ScheduledJob) {
        self.inner
            .lock()
            .scheduled_jobs
            .insert(scheduled.metadata.key(), scheduled);
    }

    /// Insert or replace a child job as-is
    pub fn put_job(&self, job: Job) {
        self.inner.lock().jobs.insert(job.metadata.key(), job);
    }

    /// Delete a scheduled job and collect the jobs it controls
    pub fn remove_scheduled_job(&self, key: &ObjectKey) -> Option<ScheduledJob> {
        let mut inner = self.inner.lock();
        let removed = inner.scheduled_jobs.remove(key)?;
        let uid = removed.metadata.uid.clone();
        inner.jobs.retain(|_, job| {
            !job.metadata
                .owner_references
                .iter()
                .any(|r| r.controller && r.uid == uid)
        });
        Some(removed)
    }

    pub fn scheduled_job(&self, key: &ObjectKey) -> Option<ScheduledJob> {
        self.inner.lock().scheduled_jobs.get(key).cloned()
    }

    pub fn job(&self, key: &ObjectKey) -> Option<Job> {
        self.inner.lock().jobs.get(key).cloned()
    }

    /// All child jobs, ordered by key
    pub fn jobs(&self) -> Vec<Job> {
        self.inner.lock().jobs.values().cloned().collect()
    }

    pub fn job_names(&self) -> Vec<String> {
        self.inner
            .lock()
            .jobs
            .values()
            .map(|j| j.metadata.name.clone())
            .collect()
    }

    /// Mutate a stored job in place (e.g. to simulate executor progress)
    pub fn update_job(&self, key: &ObjectKey, f: impl FnOnce(&mut Job)) {
        if let Some(job) = self.inner.lock().jobs.get_mut(key) {
            f(job);
        }
    }

    /// Fail the next `op` call
    pub fn fail_next(&self, op: StoreOp, error: StoreError) {
        self.push_failure(op, None, error);
    }

    /// Fail the next `op` call on the object named `name`
    pub fn fail_next_on(&self, op: StoreOp, name: &str, error: StoreError) {
        self.push_failure(op, Some(name.to_string()), error);
    }

    fn push_failure(&self, op: StoreOp, name: Option<String>, error: StoreError) {
        self.inner
            .lock()
            .failures
            .entry(op)
            .or_default()
            .push_back(Injected { name, error });
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded calls of one kind
    pub fn calls_of(&self, op: StoreOp) -> Vec<StoreCall> {
        self.calls().into_iter().filter(|c| c.op() == op).collect()
    }

}

#[async_trait]
impl StoreClient for FakeStore {
    async fn get_scheduled_job(&self, key: &ObjectKey) -> Result<ScheduledJob, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::Get { key: key.clone() });

        if let Some(err) = inner.take_failure(StoreOp::Get, &key.name) {
            return Err(err);
        }

        inner
            .scheduled_jobs
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                kind: "scheduled job",
                key: key.to_string(),
            })
    }

    async fn list_jobs(
        &self,
        namespace: &str,
        selector: &FieldSelector,
    ) -> Result<Vec<Job>, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::List {
            namespace: namespace.to_string(),
            selector: selector.clone(),
        });

        if let Some(err) = inner.take_failure(StoreOp::List, namespace) {
            return Err(err);
        }

        let config = inner.indexes.get(&selector.key).ok_or_else(|| {
            StoreError::Backend(format!("field index {:?} is not registered", selector.key))
        })?;

        Ok(inner
            .jobs
            .values()
            .filter(|job| job.metadata.namespace == namespace)
            .filter(|job| {
                owner_index_value(job, config).as_deref() == Some(selector.value.as_str())
            })
            .cloned()
            .collect())
    }

    async fn create_job(&self, job: &Job) -> Result<Job, StoreError> {
        let mut inner = self.inner.lock();
        let key = job.metadata.key();
        inner.calls.push(StoreCall::Create { key: key.clone() });

        if let Some(err) = inner.take_failure(StoreOp::Create, &key.name) {
            return Err(err);
        }

        if inner.jobs.contains_key(&key) {
            return Err(StoreError::AlreadyExists {
                kind: "job",
                key: key.to_string(),
            });
        }

        let mut created = job.clone();
        created.metadata.uid = Uid::new(uuid::Uuid::new_v4().to_string());
        created.metadata.creation_timestamp = Some(self.clock.now());
        inner.jobs.insert(key, created.clone());
        Ok(created)
    }

    async fn update_status(&self, scheduled: &ScheduledJob) -> Result<ScheduledJob, StoreError> {
        let mut inner = self.inner.lock();
        let key = scheduled.metadata.key();
        inner.calls.push(StoreCall::UpdateStatus { key: key.clone() });

        if let Some(err) = inner.take_failure(StoreOp::UpdateStatus, &key.name) {
            return Err(err);
        }

        let stored = inner
            .scheduled_jobs
            .get_mut(&key)
            .ok_or_else(|| StoreError::NotFound {
                kind: "scheduled job",
                key: key.to_string(),
            })?;
        if stored.metadata.uid != scheduled.metadata.uid {
            return Err(StoreError::Conflict {
                key: key.to_string(),
                reason: "uid precondition failed".to_string(),
            });
        }
        stored.status = scheduled.status.clone();
        Ok(stored.clone())
    }

    async fn delete_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        let key = job.metadata.key();
        inner.calls.push(StoreCall::Delete { key: key.clone() });

        if let Some(err) = inner.take_failure(StoreOp::Delete, &key.name) {
            return Err(err);
        }

        match inner.jobs.remove(&key) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound {
                kind: "job",
                key: key.to_string(),
            }),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
