// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the reconciler

use cj_adapters::StoreError;
use cj_core::ObjectKey;
use thiserror::Error;

/// Failures that abort a reconcile and are handed back to the caller for
/// retry with backoff.
///
/// Conditions that pause a scheduled job (bad schedule, too many missed runs,
/// broken template) are not errors here; they end the reconcile with a
/// logged outcome instead.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("failed to fetch scheduled job {key}: {source}")]
    Fetch { key: ObjectKey, source: StoreError },
    #[error("failed to list jobs of {key}: {source}")]
    List { key: ObjectKey, source: StoreError },
    #[error("failed to update status of {key}: {source}")]
    UpdateStatus { key: ObjectKey, source: StoreError },
    #[error("failed to delete active job {job} for replacement: {source}")]
    Replace { job: ObjectKey, source: StoreError },
    #[error("failed to create job {job}: {source}")]
    Create { job: ObjectKey, source: StoreError },
}
