// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention of finished jobs

use cj_adapters::StoreClient;
use cj_core::Job;

/// Outcome of one pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
}

/// Jobs beyond the `limit` most recent by start time, oldest first.
///
/// Jobs that never started sort before all others, so they go first.
pub fn excess_jobs(mut jobs: Vec<Job>, limit: u32) -> Vec<Job> {
    let limit = limit as usize;
    if jobs.len() <= limit {
        return Vec::new();
    }
    jobs.sort_by_key(|job| job.start_time());
    let excess = jobs.len() - limit;
    jobs.truncate(excess);
    jobs
}

/// Delete finished jobs beyond `limit`. `None` keeps everything.
///
/// Deletion is best effort: a failure is logged and the pass moves on. The
/// next reconcile will find the job again.
pub async fn prune_history<S: StoreClient>(
    store: &S,
    jobs: Vec<Job>,
    limit: Option<u32>,
    outcome: &str,
) -> PruneReport {
    let mut report = PruneReport::default();
    let Some(limit) = limit else {
        return report;
    };

    for job in excess_jobs(jobs, limit) {
        let key = job.metadata.key();
        match store.delete_job(&job).await {
            Ok(()) => {
                tracing::info!(job = %key, outcome, "deleted old job");
                report.deleted.push(key.name);
            }
            Err(e) => {
                tracing::warn!(job = %key, outcome, error = %e, "unable to delete old job");
                report.failed.push(key.name);
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
