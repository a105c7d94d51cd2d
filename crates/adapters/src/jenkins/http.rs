// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins fetcher over HTTP.

use super::api::{self, ApiJob};
use super::feed::{self, FeedParser, FeedParserKind};
use super::{FetchError, JenkinsAdapter};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use yajn_core::{normalize_url, TrackedJob};

/// Connection settings for [`HttpJenkinsAdapter`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Whole-request timeout, body included
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub feed_parser: FeedParserKind,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            feed_parser: FeedParserKind::default(),
        }
    }
}

/// Fetches `<url>api/json/`, plus `<url>cc.xml` for views.
#[derive(Clone)]
pub struct HttpJenkinsAdapter {
    client: reqwest::Client,
    parser: Arc<dyn FeedParser>,
}

impl HttpJenkinsAdapter {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, parser: config.feed_parser.build() })
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        response.text().await.map_err(transport)
    }
}

fn transport(e: reqwest::Error) -> FetchError {
    FetchError::Transport(e.to_string())
}

#[async_trait]
impl JenkinsAdapter for HttpJenkinsAdapter {
    async fn fetch(&self, url: &str) -> Result<TrackedJob, FetchError> {
        let url = normalize_url(url);
        tracing::debug!(%url, "fetching job");

        let body = self.get_text(&format!("{url}api/json/")).await?;
        let data: ApiJob =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        let mut job = api::map_payload(&url, &data);

        if let TrackedJob::View(view) = &mut job {
            let xml = self.get_text(&format!("{url}cc.xml")).await?;
            let projects = self.parser.parse(&xml);
            tracing::debug!(
                %url,
                sub_jobs = view.jobs.len(),
                feed = projects.len(),
                "enriching view"
            );
            feed::enrich(view, &projects);
        }
        Ok(job)
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
