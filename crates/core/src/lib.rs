// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cj-core: data model for the scheduled-job controller

pub mod clock;
pub mod config;
mod env;
pub mod id;
pub mod job;
pub mod meta;
pub mod owner;
pub mod scheduled_job;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
#[allow(clippy::panic)]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, ControllerConfig};
pub use id::{ObjectKey, Uid};
pub use job::{
    ConditionStatus, FinishState, Job, JobCondition, JobConditionType, JobStatus,
    JOB_API_VERSION, JOB_KIND,
};
pub use meta::{ObjectMeta, ObjectReference, OwnerReference};
pub use owner::{
    controller_of, job_reference, owner_index_value, set_controller_reference, OwnerError,
};
pub use scheduled_job::{
    ConcurrencyPolicy, JobTemplate, ScheduledJob, ScheduledJobSpec, ScheduledJobStatus,
};
pub use time_fmt::{
    format_duration, format_elapsed, format_scheduled_time, parse_scheduled_time,
    ScheduledTimeError,
};
