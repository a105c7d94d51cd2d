// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{BuildStatus, JobRecord, TrackedJob, ViewRecord};
use std::collections::BTreeMap;

/// Proptest strategies for core types.
pub mod strategies {
    use crate::status::BuildStatus;
    use proptest::prelude::*;

    pub fn arb_build_status() -> impl Strategy<Value = BuildStatus> {
        prop_oneof![
            Just(BuildStatus::Success),
            Just(BuildStatus::Unstable),
            Just(BuildStatus::Failure),
            Just(BuildStatus::Aborted),
            Just(BuildStatus::NotBuilt),
            Just(BuildStatus::Disabled),
            Just(BuildStatus::Unknown),
        ]
    }
}

/// Fetched leaf record for `url` with the given status and build number.
pub fn leaf(url: &str, status: BuildStatus, number: u64) -> TrackedJob {
    JobRecord::builder()
        .url(url)
        .name(crate::url::default_name(url))
        .status(status)
        .last_build_number(number)
        .build()
        .into()
}

/// View at `url` holding the given `(key, record)` sub-jobs.
pub fn view(url: &str, jobs: Vec<(&str, JobRecord)>) -> TrackedJob {
    let jobs: BTreeMap<String, JobRecord> =
        jobs.into_iter().map(|(key, job)| (key.to_string(), job)).collect();
    let summary = JobRecord { name: "All jobs".to_string(), ..JobRecord::placeholder(url) };
    ViewRecord { summary, jobs }.into()
}
