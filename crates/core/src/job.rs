// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracked job records.
//!
//! A tracked URL points either at a single buildable job (a leaf) or at a
//! view that aggregates several jobs. Both share the [`JobRecord`] fields;
//! a view additionally carries its sub-jobs keyed by
//! [`sub_job_key`](crate::url::sub_job_key). On disk the presence of `jobs`
//! is what tells the two apart.

use crate::status::BuildStatus;
use crate::url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Map of tracked URL to its record. The key set is the set of tracked URLs.
pub type JobMap = BTreeMap<String, TrackedJob>;

/// Identifier of a completed build.
///
/// The JSON API reports a number while the build-history feed reports a
/// label, so this stays textual. Only monotonic per job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawBuildNumber", into = "String")]
pub struct BuildNumber(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBuildNumber {
    Number(u64),
    Label(String),
}

impl From<RawBuildNumber> for BuildNumber {
    fn from(raw: RawBuildNumber) -> Self {
        match raw {
            RawBuildNumber::Number(n) => BuildNumber(n.to_string()),
            RawBuildNumber::Label(s) => BuildNumber(s),
        }
    }
}

impl BuildNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value, when the label is a plain integer.
    pub fn as_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }

    /// Whether this is a numbered build after a job's first one.
    pub fn is_after_first(&self) -> bool {
        self.as_u64().is_some_and(|n| n > 1)
    }
}

impl From<BuildNumber> for String {
    fn from(n: BuildNumber) -> Self {
        n.0
    }
}

impl From<u64> for BuildNumber {
    fn from(n: u64) -> Self {
        BuildNumber(n.to_string())
    }
}

impl From<&str> for BuildNumber {
    fn from(s: &str) -> Self {
        BuildNumber(s.to_string())
    }
}

impl From<String> for BuildNumber {
    fn from(s: String) -> Self {
        BuildNumber(s)
    }
}

impl std::fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// State of one Jenkins job as last observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(default)]
    pub building: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build_number: Option<BuildNumber>,
    /// RFC 3339 timestamp of the last completed build
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build_time: Option<String>,
    /// Description of the last failed fetch; cleared by the next success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

crate::builder! {
    pub struct JobRecordBuilder => JobRecord {
        into {
            url: String = "http://ci.example.com/job/app/",
            name: String = "app",
        }
        set {
            status: BuildStatus = BuildStatus::Success,
            building: bool = false,
        }
        option {
            last_build_number: BuildNumber = None,
            last_build_time: String = None,
            error: String = None,
        }
    }
}

impl JobRecord {
    /// Record for a URL that has never been fetched.
    pub fn placeholder(url: &str) -> Self {
        Self {
            name: url::default_name(url),
            url: url::decode(url),
            status: BuildStatus::Unknown,
            building: false,
            last_build_number: None,
            last_build_time: None,
            error: None,
        }
    }

    /// Whether this record carries no fetched data at all.
    pub fn is_placeholder(&self) -> bool {
        self.last_build_number.is_none()
            && self.status == BuildStatus::Unknown
            && !self.building
    }

    /// URL of the last completed build, if there is one.
    pub fn build_url(&self) -> Option<String> {
        let number = self.last_build_number.as_ref()?;
        let base = if self.url.ends_with('/') { self.url.clone() } else { format!("{}/", self.url) };
        Some(format!("{base}{number}"))
    }
}

/// A view: a container URL whose sub-jobs are tracked individually.
///
/// The summary fields are a convenience only; status and building are
/// authoritative on the sub-jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    #[serde(flatten)]
    pub summary: JobRecord,
    pub jobs: BTreeMap<String, JobRecord>,
}

/// Everything tracked under one URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackedJob {
    View(ViewRecord),
    Leaf(JobRecord),
}

impl TrackedJob {
    /// Default record for a newly tracked URL.
    pub fn placeholder(url: &str) -> Self {
        TrackedJob::Leaf(JobRecord::placeholder(url))
    }

    /// The leaf record, or the summary of a view.
    pub fn record(&self) -> &JobRecord {
        match self {
            TrackedJob::Leaf(job) => job,
            TrackedJob::View(view) => &view.summary,
        }
    }

    pub fn record_mut(&mut self) -> &mut JobRecord {
        match self {
            TrackedJob::Leaf(job) => job,
            TrackedJob::View(view) => &mut view.summary,
        }
    }

    /// Sub-jobs, present only for views.
    pub fn jobs(&self) -> Option<&BTreeMap<String, JobRecord>> {
        match self {
            TrackedJob::Leaf(_) => None,
            TrackedJob::View(view) => Some(&view.jobs),
        }
    }

    pub fn is_view(&self) -> bool {
        matches!(self, TrackedJob::View(_))
    }

    pub fn url(&self) -> &str {
        &self.record().url
    }

    pub fn error(&self) -> Option<&str> {
        self.record().error.as_deref()
    }

    pub fn is_placeholder(&self) -> bool {
        match self {
            TrackedJob::Leaf(job) => job.is_placeholder(),
            TrackedJob::View(_) => false,
        }
    }

    /// Copy of this record with the fetch error set, data untouched.
    pub fn with_error(&self, error: impl Into<String>) -> Self {
        let mut failed = self.clone();
        failed.record_mut().error = Some(error.into());
        failed
    }

    /// Leaf records: the record itself, or every sub-job of a view.
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &JobRecord> + '_> {
        match self {
            TrackedJob::Leaf(job) => Box::new(std::iter::once(job)),
            TrackedJob::View(view) => Box::new(view.jobs.values()),
        }
    }
}

impl From<JobRecord> for TrackedJob {
    fn from(job: JobRecord) -> Self {
        TrackedJob::Leaf(job)
    }
}

impl From<ViewRecord> for TrackedJob {
    fn from(view: ViewRecord) -> Self {
        TrackedJob::View(view)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
