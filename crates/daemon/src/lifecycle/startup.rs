// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup.

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use fs2::FileExt;
use tracing::info;
use yajn_adapters::{DesktopNotifyAdapter, HttpJenkinsAdapter};
use yajn_engine::{EventBus, JobStore, Synchronizer};
use yajn_storage::{FileStorage, Persistence, StorageWatcher};

use super::{DaemonState, LifecycleError};
use crate::config::Config;

/// Take the exclusive daemon lock and record our PID in it.
pub fn acquire_lock(config: &Config) -> Result<File, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Open without truncating; another daemon's PID stays intact if we lose
    let lock_file = std::fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    Ok(lock_file)
}

/// Wire storage, fetcher, notifier and synchronizer.
///
/// Nothing is fetched yet; [`DaemonState::run`] performs the initial refresh.
pub fn startup(config: Config, lock_file: File) -> Result<DaemonState, LifecycleError> {
    let storage = FileStorage::open(config.state_dir.clone())?;
    let options = storage.load_options()?;
    let (watcher, external) = StorageWatcher::start(storage.clone())?;

    let jenkins = HttpJenkinsAdapter::new(&config.settings.http_config())
        .map_err(|e| LifecycleError::Http(e.to_string()))?;
    let store = Arc::new(JobStore::open(jenkins, storage, EventBus::new())?);
    info!(
        jobs = store.urls().len(),
        refresh_secs = options.refresh_time_seconds,
        mode = %options.notification_mode,
        "state loaded"
    );

    let jobs_changed = store.events().subscribe_jobs();
    let sync = Synchronizer::with_icon(
        store,
        DesktopNotifyAdapter::new(),
        options,
        config.settings.icon(),
    );

    Ok(DaemonState {
        config,
        lock_file,
        sync: Arc::new(sync),
        _watcher: watcher,
        external,
        jobs_changed,
    })
}
