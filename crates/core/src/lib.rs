// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! yajn-core: data model for the yajn Jenkins notifier

pub mod macros;

pub mod badge;
pub mod change;
pub mod job;
pub mod notification;
pub mod options;
pub mod status;
pub mod time_fmt;
pub mod url;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use badge::BadgeSummary;
pub use change::JobChange;
#[cfg(any(test, feature = "test-support"))]
pub use job::JobRecordBuilder;
pub use job::{BuildNumber, JobMap, JobRecord, TrackedJob, ViewRecord};
pub use notification::Notification;
pub use options::{NotificationMode, Options, ParseModeError, Shortcut};
pub use status::BuildStatus;
pub use time_fmt::{format_elapsed, format_since, to_iso8601};
pub use url::{default_name, job_base_url, normalize_url, sub_job_key};
