// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The CLI's own store instance over the shared state directory.
//!
//! Writes land in the same `jobs.json` the daemon watches, so the daemon
//! picks them up without being contacted.

use std::sync::Arc;

use yajn_adapters::HttpJenkinsAdapter;
use yajn_daemon::Config;
use yajn_engine::{EventBus, JobStore};
use yajn_storage::FileStorage;

pub type CliStore = JobStore<HttpJenkinsAdapter, FileStorage>;

pub struct State {
    pub storage: FileStorage,
    pub store: Arc<CliStore>,
}

impl State {
    pub fn open() -> anyhow::Result<Self> {
        let config = Config::load()?;
        let storage = FileStorage::open(config.state_dir.clone())?;
        let jenkins = HttpJenkinsAdapter::new(&config.settings.http_config())?;
        let store = Arc::new(JobStore::open(jenkins, storage.clone(), EventBus::new())?);
        tracing::debug!(state_dir = %config.state_dir.display(), "opened state");
        Ok(Self { storage, store })
    }
}
