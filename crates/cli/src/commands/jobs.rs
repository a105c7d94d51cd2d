// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracked-URL command handlers: add, remove, set, refresh

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use yajn_adapters::JenkinsAdapter;
use yajn_core::{job_base_url, normalize_url, JobChange};
use yajn_engine::{JobStore, StoreError};
use yajn_storage::Persistence;

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct AddArgs {
    /// Job or view URL
    pub url: String,
    /// Treat the URL as a build or console page and track the job owning it.
    /// The job is fetched first and not tracked if Jenkins cannot be reached.
    #[arg(long)]
    pub page: bool,
    /// Only add the URL; leave fetching to the daemon
    #[arg(long, conflicts_with = "page")]
    pub no_refresh: bool,
}

#[derive(Args)]
pub struct SetArgs {
    /// URLs to track; `-` reads newline-separated URLs from stdin
    pub urls: Vec<String>,
    /// Read newline-separated URLs from a file
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

/// Invalid URLs are a usage error, not an internal failure.
fn store_error(e: StoreError) -> anyhow::Error {
    match e {
        StoreError::InvalidUrl(_) => ExitError::usage(e.to_string()).into(),
        other => other.into(),
    }
}

/// Describe the outcome of a fetch on one line.
fn report(change: &JobChange, out: &mut dyn Write) -> std::io::Result<()> {
    let Some(current) = &change.current else {
        return Ok(());
    };
    let record = current.record();
    if let Some(error) = current.error() {
        return writeln!(out, "{}: fetch failed: {}", record.name, error);
    }
    match current.jobs() {
        Some(jobs) => writeln!(out, "{}: {} jobs", record.name, jobs.len()),
        None => {
            let number =
                record.last_build_number.as_ref().map(|n| format!(" #{n}")).unwrap_or_default();
            let building = if record.building { " (building)" } else { "" };
            writeln!(out, "{}: {}{}{}", record.name, record.status.label(), number, building)
        }
    }
}

pub async fn add<J: JenkinsAdapter, S: Persistence>(
    store: &JobStore<J, S>,
    args: AddArgs,
    out: &mut dyn Write,
) -> Result<()> {
    if args.page {
        return add_page(store, &args.url, out).await;
    }

    let change = store.upsert(&args.url, None).map_err(store_error)?;
    if change.previous.is_some() {
        writeln!(out, "Already tracking {}", change.url)?;
    } else {
        writeln!(out, "Tracking {}", change.url)?;
    }

    if !args.no_refresh {
        let refreshed = store.refresh_one(&change.url).await?;
        report(&refreshed, out)?;
    }
    Ok(())
}

/// Track the job owning a build or console page, but only once Jenkins
/// confirms it exists.
async fn add_page<J: JenkinsAdapter, S: Persistence>(
    store: &JobStore<J, S>,
    page: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let url = job_base_url(page.trim())
        .ok_or_else(|| ExitError::usage(format!("no job in page URL: {page}")))?;
    let change = store.add_verified(&url).await.map_err(store_error)?;
    if change.previous.is_some() {
        writeln!(out, "Already tracking {}", change.url)?;
    } else {
        writeln!(out, "Tracking {}", change.url)?;
    }
    report(&change, out)?;
    Ok(())
}

pub fn remove<J: JenkinsAdapter, S: Persistence>(
    store: &JobStore<J, S>,
    url: &str,
    out: &mut dyn Write,
) -> Result<()> {
    let change = store.remove(url)?;
    if change.previous.is_none() {
        return Err(ExitError::not_tracked(&change.url).into());
    }
    writeln!(out, "Removed {}", change.url)?;
    Ok(())
}

/// Non-empty, non-comment lines of a URL list.
pub fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// URLs named on the command line, with `-` expanded from `stdin`, then
/// those listed in `--file`.
pub fn collect_urls(args: &SetArgs, stdin: &mut dyn Read) -> Result<Vec<String>> {
    if args.urls.is_empty() && args.file.is_none() {
        return Err(ExitError::usage("no URLs given (pass URLs, --file, or - for stdin)").into());
    }
    let mut urls = Vec::new();
    for url in &args.urls {
        if url == "-" {
            let mut text = String::new();
            stdin.read_to_string(&mut text)?;
            urls.extend(parse_url_list(&text));
        } else {
            urls.push(url.clone());
        }
    }
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
        urls.extend(parse_url_list(&text));
    }
    Ok(urls)
}

pub fn set<J: JenkinsAdapter, S: Persistence>(
    store: &JobStore<J, S>,
    urls: &[String],
    out: &mut dyn Write,
) -> Result<()> {
    let jobs = store.replace_all(urls).map_err(store_error)?;
    writeln!(out, "Tracking {} job(s)", jobs.len())?;
    Ok(())
}

/// Refresh one tracked URL, or every tracked URL concurrently.
///
/// Fetch failures are reported but do not fail the command; the last
/// known data is kept either way. Outcomes that could not be saved are
/// reported per job and fail the command once every job has been listed.
pub async fn refresh<J: JenkinsAdapter, S: Persistence>(
    store: &Arc<JobStore<J, S>>,
    url: Option<&str>,
    out: &mut dyn Write,
) -> Result<()> {
    if let Some(url) = url {
        if store.get(url).is_none() {
            return Err(ExitError::not_tracked(&normalize_url(url)).into());
        }
        let change = store.refresh_one(url).await?;
        report(&change, out)?;
        return Ok(());
    }

    let urls = store.urls();
    let pending = store.refresh_all();
    let total = pending.len();
    let mut failed = 0;
    let mut unsaved = 0;
    let outcomes = futures_util::future::join_all(pending).await;
    for (url, outcome) in urls.iter().zip(outcomes) {
        match outcome.map_err(anyhow::Error::from).and_then(|r| r.map_err(Into::into)) {
            Ok(change) => {
                if change.current.as_ref().is_some_and(|job| job.error().is_some()) {
                    failed += 1;
                }
                report(&change, out)?;
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "refresh not saved");
                failed += 1;
                unsaved += 1;
                writeln!(out, "{url}: not saved: {e}")?;
            }
        }
    }
    writeln!(out, "Refreshed {} job(s), {} failed", total, failed)?;
    if unsaved > 0 {
        anyhow::bail!("{unsaved} refreshed job(s) could not be saved");
    }
    Ok(())
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
