// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon paths and daemon-only settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use yajn_adapters::{FeedParserKind, HttpConfig};

use crate::env;
use crate::lifecycle::{LifecycleError, SETTINGS_FILE};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory, shared with the CLI
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    pub settings: DaemonSettings,
}

impl Config {
    /// Resolve the state directory from the environment and load settings.
    pub fn load() -> Result<Self, LifecycleError> {
        Self::for_state_dir(env::state_dir()?)
    }

    pub fn for_state_dir(state_dir: PathBuf) -> Result<Self, LifecycleError> {
        let settings = DaemonSettings::load(&state_dir.join(SETTINGS_FILE))?.with_env_overrides();
        Ok(Self {
            lock_path: state_dir.join("daemon.pid"),
            log_path: state_dir.join("daemon.log"),
            settings,
            state_dir,
        })
    }
}

/// Contents of `daemon.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaemonSettings {
    pub feed_parser: FeedParserKind,
    pub http_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Icon shown with build notifications
    pub notification_icon: Option<PathBuf>,
    #[serde(skip)]
    http_timeout_override: Option<Duration>,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            feed_parser: FeedParserKind::default(),
            http_timeout_secs: 30,
            connect_timeout_secs: 10,
            notification_icon: None,
            http_timeout_override: None,
        }
    }
}

impl DaemonSettings {
    /// Parse the settings file; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        toml::from_str(&text)
            .map_err(|e| LifecycleError::Settings(path.to_path_buf(), e.to_string()))
    }

    fn with_env_overrides(mut self) -> Self {
        if let Some(kind) = env::feed_parser() {
            self.feed_parser = kind;
        }
        self.http_timeout_override = env::http_timeout();
        self
    }

    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            timeout: self
                .http_timeout_override
                .unwrap_or(Duration::from_secs(self.http_timeout_secs)),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            feed_parser: self.feed_parser,
        }
    }

    pub fn icon(&self) -> Option<String> {
        self.notification_icon.as_ref().map(|p| p.display().to_string())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
