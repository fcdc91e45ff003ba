// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concurrency policy enforcement against the active job set

use crate::error::ReconcileError;
use cj_adapters::StoreClient;
use cj_core::{ConcurrencyPolicy, Job};

/// Whether a due run may start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConcurrencyDecision {
    Proceed,
    /// `Forbid` with a run still active
    Skip,
}

/// Apply `policy` to the currently active jobs.
///
/// `Replace` deletes every active job before returning `Proceed`. A job that
/// is already gone counts as deleted; any other failure aborts, since a
/// surviving job would run alongside its replacement.
pub async fn enforce<S: StoreClient>(
    store: &S,
    policy: ConcurrencyPolicy,
    active: &[Job],
) -> Result<ConcurrencyDecision, ReconcileError> {
    match policy {
        ConcurrencyPolicy::Allow => Ok(ConcurrencyDecision::Proceed),
        ConcurrencyPolicy::Forbid if !active.is_empty() => {
            tracing::debug!(
                active = active.len(),
                "concurrency policy blocks concurrent runs, skipping"
            );
            Ok(ConcurrencyDecision::Skip)
        }
        ConcurrencyPolicy::Forbid => Ok(ConcurrencyDecision::Proceed),
        ConcurrencyPolicy::Replace => {
            for job in active {
                let key = job.metadata.key();
                match store.delete_job(job).await {
                    Ok(()) => tracing::info!(job = %key, "deleted active job for replacement"),
                    Err(e) if e.is_not_found() => {
                        tracing::debug!(job = %key, "active job already gone")
                    }
                    Err(source) => return Err(ReconcileError::Replace { job: key, source }),
                }
            }
            Ok(ConcurrencyDecision::Proceed)
        }
    }
}

#[cfg(test)]
#[path = "concurrency_tests.rs"]
mod tests;
