// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views of the job map: list and status

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use yajn_core::{BadgeSummary, JobMap};

use crate::color;
use crate::output::{format_or_json, job_rows, write_rows, OutputFormat};

/// Every tracked URL. JSON output is the job map as stored.
pub fn list(
    jobs: &JobMap,
    format: OutputFormat,
    now: DateTime<Utc>,
    out: &mut dyn Write,
) -> Result<()> {
    format_or_json(format, jobs, out, |out| {
        if jobs.is_empty() {
            return writeln!(out, "No jobs tracked");
        }
        write_rows(&job_rows(jobs, now), out)
    })
}

#[derive(Debug, Serialize)]
struct StatusReport {
    text: String,
    color: &'static str,
    tooltip: String,
    counts: BadgeSummary,
}

/// The badge an extension would show for the current job map.
pub fn status(jobs: &JobMap, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    let badge = BadgeSummary::from_jobs(jobs);
    let report = StatusReport {
        text: badge.text(),
        color: badge.color(),
        tooltip: badge.tooltip(),
        counts: badge,
    };
    format_or_json(format, &report, out, |out| {
        let text = if report.text.is_empty() { "-" } else { report.text.as_str() };
        writeln!(out, "{} {} {}", color::header("Badge:"), text, color::muted(report.color))?;
        writeln!(out, "{} {}", color::header("Jobs: "), report.tooltip)
    })
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
