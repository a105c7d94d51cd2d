// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-glyph summary of every tracked job.
//!
//! Views contribute each of their sub-jobs. A building job is counted as
//! building regardless of its last status.

use crate::job::JobMap;
use crate::status::BuildStatus;
use serde::Serialize;

const COLOR_FAILURE: &str = "#c9302c";
const COLOR_UNSTABLE: &str = "#f0ad4e";
const COLOR_BUILDING: &str = "#337ab7";
const COLOR_SUCCESS: &str = "#5cb85c";
const COLOR_IDLE: &str = "#777777";

/// Counts by status across all leaf jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BadgeSummary {
    pub success: usize,
    pub unstable: usize,
    pub failure: usize,
    pub building: usize,
    /// Aborted, disabled, not built, unknown
    pub other: usize,
}

impl BadgeSummary {
    pub fn from_jobs(jobs: &JobMap) -> Self {
        let mut summary = Self::default();
        for job in jobs.values().flat_map(|tracked| tracked.leaves()) {
            if job.building {
                summary.building += 1;
                continue;
            }
            match job.status {
                BuildStatus::Success => summary.success += 1,
                BuildStatus::Unstable => summary.unstable += 1,
                BuildStatus::Failure => summary.failure += 1,
                _ => summary.other += 1,
            }
        }
        summary
    }

    /// Badge text: the highest-priority non-zero count, or empty.
    pub fn text(&self) -> String {
        [self.failure, self.unstable, self.building, self.success]
            .into_iter()
            .find(|n| *n > 0)
            .map(|n| n.to_string())
            .unwrap_or_default()
    }

    /// Badge background color, by the same priority as [`Self::text`].
    pub fn color(&self) -> &'static str {
        if self.failure > 0 {
            COLOR_FAILURE
        } else if self.unstable > 0 {
            COLOR_UNSTABLE
        } else if self.building > 0 {
            COLOR_BUILDING
        } else if self.success > 0 {
            COLOR_SUCCESS
        } else {
            COLOR_IDLE
        }
    }

    pub fn tooltip(&self) -> String {
        let parts: Vec<String> = [
            (self.failure, "Failed"),
            (self.unstable, "Unstable"),
            (self.building, "Building"),
            (self.success, "Successful"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();

        if parts.is_empty() {
            "No jobs".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
#[path = "badge_tests.rs"]
mod tests;
