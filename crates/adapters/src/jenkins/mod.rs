// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote fetcher: the Jenkins server as seen by the sync engine.

pub mod api;
pub mod feed;
mod http;

pub use feed::{FeedParser, FeedParserKind, PermissiveFeedParser, StrictFeedParser};
pub use http::{HttpConfig, HttpJenkinsAdapter};

use async_trait::async_trait;
use thiserror::Error;
use yajn_core::TrackedJob;

/// Text stored on a record when a failure carries no description.
pub const UNREACHABLE: &str = "Unreachable";

/// Why a fetch produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Non-OK HTTP response; displays as the status description
    #[error("{}", or_unreachable(.reason))]
    Status { code: u16, reason: String },
    #[error("{}", or_unreachable(.0))]
    Transport(String),
    #[error("{}", or_unreachable(.0))]
    Decode(String),
}

fn or_unreachable(text: &str) -> &str {
    if text.trim().is_empty() {
        UNREACHABLE
    } else {
        text
    }
}

/// Fetches the current state of one tracked URL.
#[async_trait]
pub trait JenkinsAdapter: Clone + Send + Sync + 'static {
    /// Fetch `url` (a job, view, folder or computer) and map it to a record.
    ///
    /// Views come back with their sub-jobs populated and enriched from the
    /// build-history feed. Never retries.
    async fn fetch(&self, url: &str) -> Result<TrackedJob, FetchError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{FetchError, JenkinsAdapter};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use yajn_core::TrackedJob;

    #[derive(Default)]
    struct FakeJenkinsState {
        responses: HashMap<String, Result<TrackedJob, FetchError>>,
        delays: HashMap<String, Duration>,
        calls: Vec<String>,
    }

    /// Scripted Jenkins server for testing.
    ///
    /// URLs with no scripted response fail with a transport error.
    #[derive(Clone, Default)]
    pub struct FakeJenkinsAdapter {
        inner: Arc<Mutex<FakeJenkinsState>>,
    }

    impl FakeJenkinsAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Serve `job` for `url` from now on.
        pub fn respond(&self, url: &str, job: impl Into<TrackedJob>) {
            self.inner.lock().responses.insert(url.to_string(), Ok(job.into()));
        }

        /// Fail every fetch of `url` with `error` from now on.
        pub fn fail(&self, url: &str, error: FetchError) {
            self.inner.lock().responses.insert(url.to_string(), Err(error));
        }

        /// Delay responses for `url`; pairs with a paused tokio clock.
        pub fn delay(&self, url: &str, delay: Duration) {
            self.inner.lock().delays.insert(url.to_string(), delay);
        }

        /// URLs fetched so far, in call order.
        pub fn calls(&self) -> Vec<String> {
            self.inner.lock().calls.clone()
        }

        pub fn call_count(&self, url: &str) -> usize {
            self.inner.lock().calls.iter().filter(|c| c.as_str() == url).count()
        }
    }

    #[async_trait]
    impl JenkinsAdapter for FakeJenkinsAdapter {
        async fn fetch(&self, url: &str) -> Result<TrackedJob, FetchError> {
            let delay = {
                let mut inner = self.inner.lock();
                inner.calls.push(url.to_string());
                inner.delays.get(url).copied()
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            self.inner
                .lock()
                .responses
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport(String::new())))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeJenkinsAdapter;
