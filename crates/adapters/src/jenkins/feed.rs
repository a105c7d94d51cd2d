// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build-history feed (`cc.xml`) parsing and view enrichment.
//!
//! The feed carries one `<Project>` element per job with `webUrl`,
//! `lastBuildLabel` and `lastBuildTime` attributes. It only backfills
//! sub-jobs the JSON API left without a build number.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};
use yajn_core::{to_iso8601, url, BuildNumber, ViewRecord};

/// One `<Project>` entry of the feed, attributes still raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedProject {
    pub web_url: String,
    pub last_build_label: String,
    pub last_build_time: String,
}

/// Strategy for extracting projects from feed text.
pub trait FeedParser: Send + Sync + 'static {
    fn parse(&self, xml: &str) -> Vec<FeedProject>;
}

#[allow(clippy::expect_used)]
static PROJECT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<Project\b([^>]*)>").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static ORDERED_PROJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"<Project[^>]*webUrl="([^"]*)"[^>]*lastBuildLabel="([^"]*)"[^>]*lastBuildTime="([^"]*)"[^>]*>"#,
    )
    .expect("constant regex pattern is valid")
});

/// Reads every `<Project>` tag, attributes in any order and either quote style.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveFeedParser;

impl FeedParser for PermissiveFeedParser {
    fn parse(&self, xml: &str) -> Vec<FeedProject> {
        PROJECT_TAG
            .captures_iter(xml)
            .filter_map(|tag| {
                let mut web_url = None;
                let mut label = String::new();
                let mut time = String::new();
                for attr in ATTRIBUTE.captures_iter(&tag[1]) {
                    let value = attr.get(2).or_else(|| attr.get(3)).map_or("", |m| m.as_str());
                    match &attr[1] {
                        "webUrl" => web_url = Some(unescape(value)),
                        "lastBuildLabel" => label = unescape(value),
                        "lastBuildTime" => time = unescape(value),
                        _ => {}
                    }
                }
                Some(FeedProject {
                    web_url: web_url?,
                    last_build_label: label,
                    last_build_time: time,
                })
            })
            .collect()
    }
}

/// Matches the attribute order Jenkins emits. Entries in any other order are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictFeedParser;

impl FeedParser for StrictFeedParser {
    fn parse(&self, xml: &str) -> Vec<FeedProject> {
        ORDERED_PROJECT
            .captures_iter(xml)
            .map(|c| FeedProject {
                web_url: unescape(&c[1]),
                last_build_label: unescape(&c[2]),
                last_build_time: unescape(&c[3]),
            })
            .collect()
    }
}

/// Configured choice of [`FeedParser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedParserKind {
    #[default]
    Permissive,
    Strict,
}

impl FeedParserKind {
    pub fn build(self) -> Arc<dyn FeedParser> {
        match self {
            FeedParserKind::Permissive => Arc::new(PermissiveFeedParser),
            FeedParserKind::Strict => Arc::new(StrictFeedParser),
        }
    }
}

impl FromStr for FeedParserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permissive" => Ok(FeedParserKind::Permissive),
            "strict" => Ok(FeedParserKind::Strict),
            other => Err(format!("unknown feed parser '{other}'")),
        }
    }
}

/// Backfill sub-jobs of `view` from feed entries.
///
/// A sub-job that already has a build number from the JSON API keeps it;
/// its build time is filled in only when the feed describes that same build.
/// Entries that match no sub-job are ignored.
pub fn enrich(view: &mut ViewRecord, projects: &[FeedProject]) {
    for project in projects {
        let key = url::sub_job_key(&url::decode(&project.web_url));
        let Some(job) = view.jobs.get_mut(&key) else {
            tracing::trace!(%key, "feed entry matches no sub-job");
            continue;
        };
        let label = (!project.last_build_label.is_empty())
            .then(|| BuildNumber::from(project.last_build_label.as_str()));
        if job.last_build_number.is_none() {
            job.name = key;
            job.last_build_number = label;
            job.last_build_time = normalize_time(&project.last_build_time);
        } else if label.is_some() && label == job.last_build_number && job.last_build_time.is_none()
        {
            job.last_build_time = normalize_time(&project.last_build_time);
        }
    }
}

/// RFC 3339 UTC with milliseconds when parseable, the raw text otherwise.
fn normalize_time(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z"))
        .map(|t| t.with_timezone(&Utc));
    Some(match parsed {
        Ok(time) => to_iso8601(time),
        Err(_) => raw.to_string(),
    })
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
