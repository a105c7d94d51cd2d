// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The authoritative map of tracked URL to job record.
//!
//! Every mutation builds the next map on a copy, writes the whole copy
//! through [`Persistence`], and only then swaps it in and broadcasts it.
//! A failed write leaves memory untouched. The lock is held across the
//! write so the file always matches some in-memory state.

use crate::events::EventBus;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use yajn_adapters::{FetchError, JenkinsAdapter};
use yajn_core::url::is_http_url;
use yajn_core::{normalize_url, JobChange, JobMap, TrackedJob};
use yajn_storage::{Persistence, StorageError};

/// Errors surfaced to the caller of a store mutation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not an http(s) URL: '{0}'")]
    InvalidUrl(String),
    #[error("could not verify Jenkins job at {url}: {source}")]
    Unverified {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("failed to persist jobs: {0}")]
    Storage(#[from] StorageError),
}

/// One in-flight `refresh_one`, resolving independently of its siblings.
pub type PendingRefresh = JoinHandle<Result<JobChange, StoreError>>;

pub struct JobStore<J, S> {
    jenkins: J,
    storage: S,
    jobs: Mutex<JobMap>,
    events: EventBus,
}

fn validated(url: &str) -> Result<String, StoreError> {
    if is_http_url(url) {
        Ok(normalize_url(url))
    } else {
        Err(StoreError::InvalidUrl(url.trim().to_string()))
    }
}

impl<J: JenkinsAdapter, S: Persistence> JobStore<J, S> {
    /// Load the persisted map and wrap it.
    pub fn open(jenkins: J, storage: S, events: EventBus) -> Result<Self, StoreError> {
        let jobs = storage.load_jobs()?;
        tracing::debug!(jobs = jobs.len(), "job store loaded");
        Ok(Self { jenkins, storage, jobs: Mutex::new(jobs), events })
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn snapshot(&self) -> JobMap {
        self.jobs.lock().clone()
    }

    pub fn get(&self, url: &str) -> Option<TrackedJob> {
        self.jobs.lock().get(&normalize_url(url)).cloned()
    }

    pub fn urls(&self) -> Vec<String> {
        self.jobs.lock().keys().cloned().collect()
    }

    fn commit<T>(&self, mutate: impl FnOnce(&mut JobMap) -> T) -> Result<T, StoreError> {
        let (out, snapshot) = {
            let mut jobs = self.jobs.lock();
            let mut next = jobs.clone();
            let out = mutate(&mut next);
            self.storage.save_jobs(&next)?;
            let snapshot = Arc::new(next.clone());
            *jobs = next;
            (out, snapshot)
        };
        self.events.publish_jobs(snapshot);
        Ok(out)
    }

    /// Store `record` under `url`. Without a record the existing one is
    /// kept, or a placeholder is created for a new URL.
    pub fn upsert(&self, url: &str, record: Option<TrackedJob>) -> Result<JobChange, StoreError> {
        let url = validated(url)?;
        self.commit(|jobs| {
            let previous = jobs.get(&url).cloned();
            let current = record
                .or_else(|| previous.clone())
                .unwrap_or_else(|| TrackedJob::placeholder(&url));
            jobs.insert(url.clone(), current.clone());
            JobChange::new(url.clone(), previous, Some(current))
        })
    }

    /// Stop tracking `url`. Removing an untracked URL writes nothing.
    pub fn remove(&self, url: &str) -> Result<JobChange, StoreError> {
        let url = normalize_url(url);
        if !self.jobs.lock().contains_key(&url) {
            return Ok(JobChange::new(url, None, None));
        }
        self.commit(|jobs| {
            let previous = jobs.remove(&url);
            JobChange::new(url.clone(), previous, None)
        })
    }

    /// Track exactly `urls`, keeping records for URLs already tracked.
    pub fn replace_all<U: AsRef<str>>(&self, urls: &[U]) -> Result<JobMap, StoreError> {
        let urls = urls.iter().map(|u| validated(u.as_ref())).collect::<Result<Vec<_>, _>>()?;
        self.commit(|jobs| {
            let mut next = JobMap::new();
            for url in urls {
                if next.contains_key(&url) {
                    continue;
                }
                let record = jobs.remove(&url).unwrap_or_else(|| TrackedJob::placeholder(&url));
                next.insert(url, record);
            }
            *jobs = next;
            jobs.clone()
        })
    }

    /// Fetch `url` and store the outcome.
    ///
    /// A failed fetch keeps the last known record (or a placeholder) and
    /// only sets its error, so a job never vanishes on a transient failure.
    /// Only a failed write is returned as an error.
    pub async fn refresh_one(&self, url: &str) -> Result<JobChange, StoreError> {
        let url = validated(url)?;
        let record = match self.jenkins.fetch(&url).await {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(%url, error = %e, "fetch failed");
                self.get(&url)
                    .unwrap_or_else(|| TrackedJob::placeholder(&url))
                    .with_error(e.to_string())
            }
        };
        self.upsert(&url, Some(record))
    }

    /// Fetch `url` and track it only when the fetch succeeds.
    ///
    /// Nothing is written when the URL cannot be verified.
    pub async fn add_verified(&self, url: &str) -> Result<JobChange, StoreError> {
        let url = validated(url)?;
        let record = self
            .jenkins
            .fetch(&url)
            .await
            .map_err(|source| StoreError::Unverified { url: url.clone(), source })?;
        self.upsert(&url, Some(record))
    }

    /// Start a `refresh_one` for every tracked URL without waiting.
    pub fn refresh_all(self: &Arc<Self>) -> Vec<PendingRefresh> {
        self.urls()
            .into_iter()
            .map(|url| {
                let store = Arc::clone(self);
                tokio::spawn(async move { store.refresh_one(&url).await })
            })
            .collect()
    }

    /// Adopt a map written by another process, without writing it back.
    ///
    /// Returns false when it matches what is already held.
    pub fn apply_external(&self, jobs: JobMap) -> bool {
        let snapshot = {
            let mut current = self.jobs.lock();
            if *current == jobs {
                return false;
            }
            *current = jobs;
            Arc::new(current.clone())
        };
        tracing::debug!(jobs = snapshot.len(), "adopted external job map");
        self.events.publish_jobs(snapshot);
        true
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
