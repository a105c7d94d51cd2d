// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `api/json` payload and its mapping onto tracked records.

use serde::Deserialize;
use std::collections::BTreeMap;
use yajn_core::{url, BuildNumber, BuildStatus, JobRecord, TrackedJob, ViewRecord};

/// Name used when the server reports no usable name (e.g. the server root).
pub const FALLBACK_NAME: &str = "All jobs";

/// Subset of a Jenkins job/view/computer JSON object.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiJob {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub node_name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub last_completed_build: Option<ApiBuild>,
    /// Present on views and folders only
    #[serde(default)]
    pub jobs: Option<Vec<ApiJob>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiBuild {
    #[serde(default)]
    pub number: Option<BuildNumber>,
}

/// Map a payload fetched from `url` into a leaf or a view.
pub fn map_payload(url: &str, data: &ApiJob) -> TrackedJob {
    let summary = map_record(url, data);
    match &data.jobs {
        None => TrackedJob::Leaf(summary),
        Some(entries) => {
            let mut jobs = BTreeMap::new();
            collect_sub_jobs(entries, &mut jobs);
            TrackedJob::View(ViewRecord { summary, jobs })
        }
    }
}

fn map_record(fallback_url: &str, data: &ApiJob) -> JobRecord {
    let (status, building) = BuildStatus::from_color(data.color.as_deref().unwrap_or_default());
    let name = [&data.display_name, &data.name, &data.node_name]
        .into_iter()
        .flatten()
        .find(|name| !name.is_empty())
        .cloned()
        .unwrap_or_else(|| FALLBACK_NAME.to_string());
    JobRecord {
        url: url::decode(data.url.as_deref().unwrap_or(fallback_url)),
        name,
        status,
        building,
        last_build_number: data.last_completed_build.as_ref().and_then(|b| b.number.clone()),
        last_build_time: None,
        error: None,
    }
}

/// Key every leaf by its path relative to the view. Folders nested in the
/// view are flattened into the same map.
fn collect_sub_jobs(entries: &[ApiJob], jobs: &mut BTreeMap<String, JobRecord>) {
    for entry in entries {
        if let Some(nested) = &entry.jobs {
            collect_sub_jobs(nested, jobs);
            continue;
        }
        let Some(entry_url) = entry.url.as_deref() else {
            tracing::debug!(name = ?entry.name, "skipping view entry without url");
            continue;
        };
        let record = map_record(entry_url, entry);
        jobs.insert(url::sub_job_key(&record.url), record);
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;
