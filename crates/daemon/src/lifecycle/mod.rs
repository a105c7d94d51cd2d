// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, event loop, shutdown.

mod startup;
pub use startup::{acquire_lock, startup};

use std::fs::File;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use yajn_adapters::{DesktopNotifyAdapter, HttpJenkinsAdapter};
use yajn_core::{BadgeSummary, JobMap};
use yajn_engine::{StoreError, Synchronizer};
use yajn_storage::{ExternalChange, FileStorage, StorageError, StorageWatcher};

use crate::config::Config;

/// Optional daemon-only settings file inside the state directory.
pub const SETTINGS_FILE: &str = "daemon.toml";

/// Synchronizer with the concrete adapters the daemon runs.
pub type DaemonSync = Synchronizer<HttpJenkinsAdapter, FileStorage, DesktopNotifyAdapter>;

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): held to keep the exclusive lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub sync: Arc<DaemonSync>,
    // Dropping the watcher stops it
    _watcher: StorageWatcher,
    external: mpsc::Receiver<ExternalChange>,
    jobs_changed: broadcast::Receiver<Arc<JobMap>>,
}

impl DaemonState {
    /// Run until `shutdown` resolves, then shut down cleanly.
    pub async fn run(mut self, shutdown: impl Future<Output = ()>) -> Result<(), LifecycleError> {
        tokio::pin!(shutdown);

        let started = tokio::select! {
            _ = &mut shutdown => false,
            _ = self.sync.start() => true,
        };
        if !started {
            info!("shutdown requested during initial refresh");
            return self.shutdown().await;
        }
        log_badge(&self.sync.store().snapshot());

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                change = self.external.recv() => match change {
                    Some(change) => self.handle_external(change).await,
                    None => {
                        warn!("storage watcher stopped, shutting down");
                        break;
                    }
                },
                jobs = self.jobs_changed.recv() => match jobs {
                    Ok(jobs) => log_badge(&jobs),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        debug!(skipped = n, "badge updates lagged");
                        log_badge(&self.sync.store().snapshot());
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        self.shutdown().await
    }

    /// Fold a write made by another process into the running state.
    pub async fn handle_external(&self, change: ExternalChange) {
        match change {
            ExternalChange::Jobs(jobs) => {
                let count = jobs.len();
                if self.sync.store().apply_external(jobs) {
                    info!(jobs = count, "adopted external job list");
                }
            }
            ExternalChange::Options(options) => {
                info!(
                    refresh_secs = options.refresh_time_seconds,
                    mode = %options.notification_mode,
                    "adopted external options"
                );
                self.sync.apply_options(options).await;
            }
        }
    }

    /// Stop the timer and remove the PID file.
    ///
    /// In-flight fetches are left to finish or be dropped with the runtime.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        self.sync.stop().await;

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
        Ok(())
    }
}

fn log_badge(jobs: &JobMap) {
    let badge = BadgeSummary::from_jobs(jobs);
    info!(
        text = %badge.text(),
        color = badge.color(),
        tooltip = %badge.tooltip(),
        "badge"
    );
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Invalid settings in {}: {}", .0.display(), .1)]
    Settings(PathBuf, String),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),

    #[error("Failed to build HTTP client: {0}")]
    Http(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
