// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON files in the state directory.
//!
//! `jobs.json` wraps the map in a small envelope naming the process that
//! wrote it, so a watcher can tell its own writes from everyone else's:
//!
//! ```json
//! {"v":1,"writer":"6f1c…","jobs":{"http://ci/job/app/":{…}}}
//! ```
//!
//! A bare `{url: record}` map is accepted on read.

use crate::files;
use crate::{Persistence, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use yajn_core::{JobMap, Options};

pub const JOBS_FILE: &str = "jobs.json";
pub const OPTIONS_FILE: &str = "options.json";

/// Current jobs file schema version
pub const JOBS_FILE_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    v: u32,
    writer: &'a str,
    jobs: &'a JobMap,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    v: u32,
    #[serde(default)]
    writer: Option<String>,
    jobs: JobMap,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobsFileIn {
    Envelope(EnvelopeIn),
    Bare(JobMap),
}

/// Parsed contents of the jobs file.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedJobs {
    /// Instance id of the process that wrote the file, if recorded
    pub writer: Option<String>,
    pub jobs: JobMap,
}

/// File-backed [`Persistence`] rooted at a state directory.
///
/// Each instance gets a fresh writer id; clones share it.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    writer: Arc<str>,
}

impl FileStorage {
    /// Open (creating if needed) the state directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let writer: Arc<str> = uuid::Uuid::new_v4().to_string().into();
        Ok(Self { dir, writer })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn jobs_path(&self) -> PathBuf {
        self.dir.join(JOBS_FILE)
    }

    pub fn options_path(&self) -> PathBuf {
        self.dir.join(OPTIONS_FILE)
    }

    /// Id stamped on every jobs file this instance writes.
    pub fn writer_id(&self) -> &str {
        &self.writer
    }

    /// Read the jobs file as-is. `None` when it does not exist yet.
    pub fn read_jobs_file(&self) -> Result<Option<LoadedJobs>, StorageError> {
        let Some(text) = files::read_optional(&self.jobs_path())? else {
            return Ok(None);
        };
        let loaded = match serde_json::from_str(&text)? {
            JobsFileIn::Envelope(envelope) => {
                if envelope.v > JOBS_FILE_VERSION {
                    return Err(StorageError::UnsupportedVersion(envelope.v));
                }
                LoadedJobs { writer: envelope.writer, jobs: envelope.jobs }
            }
            JobsFileIn::Bare(jobs) => LoadedJobs { writer: None, jobs },
        };
        Ok(Some(loaded))
    }
}

impl Persistence for FileStorage {
    /// Loads the job map. A file that no longer parses is moved to a
    /// rotating `.bak` and an empty map is returned.
    fn load_jobs(&self) -> Result<JobMap, StorageError> {
        match self.read_jobs_file() {
            Ok(loaded) => Ok(loaded.map(|l| l.jobs).unwrap_or_default()),
            Err(StorageError::Json(e)) => {
                let bak = files::quarantine(&self.jobs_path())?;
                tracing::warn!(
                    error = %e,
                    backup = %bak.display(),
                    "jobs file corrupt, starting empty"
                );
                Ok(JobMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save_jobs(&self, jobs: &JobMap) -> Result<(), StorageError> {
        let envelope = EnvelopeOut { v: JOBS_FILE_VERSION, writer: &self.writer, jobs };
        let bytes = serde_json::to_vec(&envelope)?;
        files::write_atomic(&self.jobs_path(), &bytes)?;
        tracing::debug!(jobs = jobs.len(), "saved jobs file");
        Ok(())
    }

    /// Missing or unreadable options fall back to defaults.
    fn load_options(&self) -> Result<Options, StorageError> {
        let Some(text) = files::read_optional(&self.options_path())? else {
            return Ok(Options::default());
        };
        match serde_json::from_str(&text) {
            Ok(options) => Ok(options),
            Err(e) => {
                tracing::warn!(error = %e, "options file unreadable, using defaults");
                Ok(Options::default())
            }
        }
    }

    fn save_options(&self, options: &Options) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(options)?;
        files::write_atomic(&self.options_path(), &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_storage_tests.rs"]
mod tests;
