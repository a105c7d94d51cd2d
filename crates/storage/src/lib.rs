// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! yajn-storage: the job map and options, shared by every process through
//! the state directory

mod file_storage;
mod files;
mod watcher;

#[cfg(any(test, feature = "test-support"))]
mod memory;

pub use file_storage::{FileStorage, LoadedJobs, JOBS_FILE, JOBS_FILE_VERSION, OPTIONS_FILE};
pub use watcher::{ExternalChange, StorageWatcher};

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStorage;

use thiserror::Error;
use yajn_core::{JobMap, Options};

/// Errors from the persistence boundary
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("jobs file version {0} is newer than this build understands")]
    UnsupportedVersion(u32),
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

/// Durable home of the job map and the options object.
///
/// Job map writes always cover the whole map.
pub trait Persistence: Clone + Send + Sync + 'static {
    fn load_jobs(&self) -> Result<JobMap, StorageError>;
    fn save_jobs(&self, jobs: &JobMap) -> Result<(), StorageError>;
    fn load_options(&self) -> Result<Options, StorageError>;
    fn save_options(&self, options: &Options) -> Result<(), StorageError>;
}
