// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change detection for writes made by other processes.
//!
//! Every instance writes the same `jobs.json`. The watcher reloads it on
//! each filesystem event and forwards the map unless this instance wrote
//! it. Options are forwarded whenever they differ from the last ones seen.

use crate::file_storage::{FileStorage, JOBS_FILE, OPTIONS_FILE};
use crate::{Persistence, StorageError};
use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use yajn_core::{JobMap, Options};

/// State written by another process.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalChange {
    Jobs(JobMap),
    Options(Options),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchedFile {
    Jobs,
    Options,
}

impl WatchedFile {
    fn from_path(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            JOBS_FILE => Some(WatchedFile::Jobs),
            OPTIONS_FILE => Some(WatchedFile::Options),
            _ => None,
        }
    }
}

/// Decides which reloads are worth forwarding.
pub(crate) struct ChangeFilter {
    storage: FileStorage,
    last_options: Options,
}

impl ChangeFilter {
    pub(crate) fn new(storage: FileStorage) -> Self {
        let last_options = storage.load_options().unwrap_or_default();
        Self { storage, last_options }
    }

    fn reload(&mut self, file: WatchedFile) -> Option<ExternalChange> {
        match file {
            WatchedFile::Jobs => self.jobs(),
            WatchedFile::Options => self.options(),
        }
    }

    pub(crate) fn jobs(&mut self) -> Option<ExternalChange> {
        match self.storage.read_jobs_file() {
            Ok(Some(loaded)) => {
                if loaded.writer.as_deref() == Some(self.storage.writer_id()) {
                    return None;
                }
                Some(ExternalChange::Jobs(loaded.jobs))
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable jobs file");
                None
            }
        }
    }

    pub(crate) fn options(&mut self) -> Option<ExternalChange> {
        let options = self.storage.load_options().ok()?;
        if options == self.last_options {
            return None;
        }
        self.last_options = options.clone();
        Some(ExternalChange::Options(options))
    }
}

/// Watches the state directory until dropped.
pub struct StorageWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl StorageWatcher {
    /// Start watching `storage`'s directory. Must be called inside a tokio runtime.
    pub fn start(
        storage: FileStorage,
    ) -> Result<(Self, mpsc::Receiver<ExternalChange>), StorageError> {
        let (raw_tx, mut raw_rx) = mpsc::unbounded_channel();
        let mut watcher = notify::recommended_watcher(move |res: Result<NotifyEvent, _>| {
            let Ok(event) = res else { return };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            for file in event.paths.iter().filter_map(|p| WatchedFile::from_path(p)) {
                let _ = raw_tx.send(file);
            }
        })?;
        watcher.watch(storage.dir(), RecursiveMode::NonRecursive)?;

        let (tx, rx) = mpsc::channel(16);
        let mut filter = ChangeFilter::new(storage);
        let task = tokio::spawn(async move {
            while let Some(first) = raw_rx.recv().await {
                // One rename can raise several events; reload each file once.
                let mut pending = vec![first];
                while let Ok(file) = raw_rx.try_recv() {
                    if !pending.contains(&file) {
                        pending.push(file);
                    }
                }
                for file in pending {
                    let Some(change) = filter.reload(file) else { continue };
                    if tx.send(change).await.is_err() {
                        return;
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher, task }, rx))
    }
}

impl Drop for StorageWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
