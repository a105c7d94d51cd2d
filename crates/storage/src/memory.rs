// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::{Persistence, StorageError};
use parking_lot::Mutex;
use std::sync::Arc;
use yajn_core::{JobMap, Options};

#[derive(Default)]
struct MemoryState {
    jobs: JobMap,
    options: Options,
    job_saves: usize,
    fail_saves: bool,
}

/// In-memory [`Persistence`] for tests.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(jobs: JobMap) -> Self {
        let storage = Self::default();
        storage.inner.lock().jobs = jobs;
        storage
    }

    /// The map as last saved.
    pub fn saved_jobs(&self) -> JobMap {
        self.inner.lock().jobs.clone()
    }

    /// Number of successful job map writes.
    pub fn job_saves(&self) -> usize {
        self.inner.lock().job_saves
    }

    /// Make every subsequent save fail until turned off again.
    pub fn fail_saves(&self, fail: bool) {
        self.inner.lock().fail_saves = fail;
    }
}

impl Persistence for MemoryStorage {
    fn load_jobs(&self) -> Result<JobMap, StorageError> {
        Ok(self.inner.lock().jobs.clone())
    }

    fn save_jobs(&self, jobs: &JobMap) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        if inner.fail_saves {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        inner.jobs = jobs.clone();
        inner.job_saves += 1;
        Ok(())
    }

    fn load_options(&self) -> Result<Options, StorageError> {
        Ok(self.inner.lock().options.clone())
    }

    fn save_options(&self, options: &Options) -> Result<(), StorageError> {
        let mut inner = self.inner.lock();
        if inner.fail_saves {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        inner.options = options.clone();
        Ok(())
    }
}
