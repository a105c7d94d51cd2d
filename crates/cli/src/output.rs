// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use yajn_core::{format_since, JobMap, JobRecord};

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format-branch helper: pretty JSON when asked for, otherwise `text_fn`.
pub fn format_or_json<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
    out: &mut dyn Write,
    text_fn: impl FnOnce(&mut dyn Write) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(data)?)?;
        }
        OutputFormat::Text => {
            text_fn(out)?;
        }
    }
    Ok(())
}

/// One line of `yajn list`. Sub-jobs of a view follow their view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRow {
    pub name: String,
    /// 0 for a tracked URL, 1 for a sub-job of a view
    pub depth: usize,
    pub status: String,
    pub icon: &'static str,
    pub building: bool,
    pub number: String,
    pub since: String,
    pub error: Option<String>,
}

impl JobRow {
    fn from_record(name: String, depth: usize, job: &JobRecord, now: DateTime<Utc>) -> Self {
        let since = job
            .last_build_time
            .as_deref()
            .and_then(|t| format_since(t, now))
            .map(|s| format!("{s} ago"))
            .unwrap_or_default();
        Self {
            name,
            depth,
            status: job.status.label().to_string(),
            icon: job.status.icon(),
            building: job.building,
            number: job.last_build_number.as_ref().map(|n| format!("#{n}")).unwrap_or_default(),
            since,
            error: job.error.clone(),
        }
    }

    fn indented_name(&self) -> String {
        format!("{}{}", "  ".repeat(self.depth), self.name)
    }
}

/// Flatten the job map into display rows, in URL order.
pub fn job_rows(jobs: &JobMap, now: DateTime<Utc>) -> Vec<JobRow> {
    let mut rows = Vec::new();
    for tracked in jobs.values() {
        let record = tracked.record();
        let mut row = JobRow::from_record(record.name.clone(), 0, record, now);
        match tracked.jobs() {
            Some(sub_jobs) => {
                row.status = format!("{} jobs", sub_jobs.len());
                row.icon = "grey";
                rows.push(row);
                for (key, job) in sub_jobs {
                    rows.push(JobRow::from_record(key.clone(), 1, job, now));
                }
            }
            None => rows.push(row),
        }
    }
    rows
}

const STATUS_WIDTH: usize = 10;
const NUMBER_WIDTH: usize = 7;

pub fn write_rows(rows: &[JobRow], out: &mut dyn Write) -> std::io::Result<()> {
    let width = rows.iter().map(|r| r.indented_name().chars().count()).max().unwrap_or(0);
    for row in rows {
        let mut line = format!(
            "{} {:<width$}  {}{:<NUMBER_WIDTH$} {}",
            color::status(row.icon, "●"),
            row.indented_name(),
            color::status(row.icon, &format!("{:<STATUS_WIDTH$}", row.status)),
            row.number,
            color::muted(&row.since),
        );
        if row.building {
            line.push_str("  building");
        }
        if let Some(error) = &row.error {
            line.push_str(&format!("  ! {error}"));
        }
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
