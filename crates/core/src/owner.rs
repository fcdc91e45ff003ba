// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ownership links between scheduled jobs and their child jobs.
//!
//! A child job carries a controller owner reference to the scheduled job that
//! created it. The store uses the link for cascading deletion, and the owner
//! index derived from it lets the reconciler list one parent's children
//! without scanning the whole namespace.

use crate::config::ControllerConfig;
use crate::job::{Job, JOB_API_VERSION, JOB_KIND};
use crate::meta::{ObjectMeta, ObjectReference, OwnerReference};
use crate::scheduled_job::ScheduledJob;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnerError {
    #[error("object {0} has no uid; it must be persisted before it can be referenced")]
    MissingUid(String),
    #[error("object {child} is already controlled by {kind} {name}")]
    AlreadyOwned {
        child: String,
        kind: String,
        name: String,
    },
    #[error("cross-namespace owner reference from {child} to {owner} is not allowed")]
    CrossNamespace { child: String, owner: String },
}

/// The controller owner reference of an object, if any.
pub fn controller_of(meta: &ObjectMeta) -> Option<&OwnerReference> {
    meta.owner_references.iter().find(|r| r.controller)
}

/// Mark `owner` as the controller of `child`.
///
/// Replaces an existing controller reference to the same owner; fails if a
/// different object already controls the child.
pub fn set_controller_reference(
    owner: &ScheduledJob,
    child: &mut ObjectMeta,
    config: &ControllerConfig,
) -> Result<(), OwnerError> {
    let owner_meta = &owner.metadata;
    if owner_meta.uid.is_empty() {
        return Err(OwnerError::MissingUid(owner_meta.key().to_string()));
    }
    if owner_meta.namespace != child.namespace {
        return Err(OwnerError::CrossNamespace {
            child: child.key().to_string(),
            owner: owner_meta.key().to_string(),
        });
    }

    let reference = OwnerReference {
        api_version: config.api_version.clone(),
        kind: config.kind.clone(),
        name: owner_meta.name.clone(),
        uid: owner_meta.uid.clone(),
        controller: true,
        block_owner_deletion: true,
    };

    if let Some(existing) = controller_of(child) {
        if existing.uid != reference.uid {
            return Err(OwnerError::AlreadyOwned {
                child: child.key().to_string(),
                kind: existing.kind.clone(),
                name: existing.name.clone(),
            });
        }
    }

    child.owner_references.retain(|r| r.uid != reference.uid);
    child.owner_references.push(reference);
    Ok(())
}

/// Owner index entry for a job: its controller's name, when that controller
/// is a scheduled job of the configured type.
pub fn owner_index_value(job: &Job, config: &ControllerConfig) -> Option<String> {
    let owner = controller_of(&job.metadata)?;
    if owner.api_version != config.api_version || owner.kind != config.kind {
        return None;
    }
    Some(owner.name.clone())
}

/// Reference to a persisted child job, as recorded in `status.active`.
pub fn job_reference(job: &Job) -> Result<ObjectReference, OwnerError> {
    if job.metadata.uid.is_empty() {
        return Err(OwnerError::MissingUid(job.metadata.key().to_string()));
    }
    Ok(ObjectReference {
        api_version: JOB_API_VERSION.to_string(),
        kind: JOB_KIND.to_string(),
        namespace: job.metadata.namespace.clone(),
        name: job.metadata.name.clone(),
        uid: job.metadata.uid.clone(),
    })
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
