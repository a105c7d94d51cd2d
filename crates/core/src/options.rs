// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User options shared by every process through the options file.

use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Default refresh period in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 60;

/// Which build results produce a desktop notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationMode {
    /// Every new build result
    #[default]
    All,
    /// Non-success results, plus recoveries back to success
    Unstable,
    /// Nothing; periodic polling is disabled too
    None,
}

crate::simple_display! {
    NotificationMode {
        All => "all",
        Unstable => "unstable",
        None => "none",
    }
}

#[derive(Debug, Error)]
#[error("unknown notification mode '{0}' (expected all, unstable or none)")]
pub struct ParseModeError(String);

impl FromStr for NotificationMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(NotificationMode::All),
            "unstable" => Ok(NotificationMode::Unstable),
            "none" => Ok(NotificationMode::None),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Keyboard shortcut for adding the current page as a tracked job.
///
/// Stored for UI collaborators; the sync engine never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub key: String,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub alt_key: bool,
}

impl Default for Shortcut {
    fn default() -> Self {
        Self { key: "j".to_string(), shift_key: true, ctrl_key: false, alt_key: false }
    }
}

/// Options object persisted next to the job map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredOptions")]
pub struct Options {
    pub refresh_time_seconds: u64,
    pub notification_mode: NotificationMode,
    pub add_job_shortcut: Shortcut,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            refresh_time_seconds: DEFAULT_REFRESH_SECS,
            notification_mode: NotificationMode::default(),
            add_job_shortcut: Shortcut::default(),
        }
    }
}

impl Options {
    /// Refresh period, never shorter than one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_time_seconds.max(1))
    }

    /// Whether periodic polling should run at all.
    pub fn polling_enabled(&self) -> bool {
        self.notification_mode != NotificationMode::None
    }
}

/// Options as read back from disk.
///
/// Older files name the first two fields `refreshTime` and `notification`.
/// A file may carry both spellings; the current key wins.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredOptions {
    #[serde(default, deserialize_with = "seconds_from_number_or_text")]
    refresh_time_seconds: Option<u64>,
    #[serde(default, deserialize_with = "seconds_from_number_or_text")]
    refresh_time: Option<u64>,
    notification_mode: Option<NotificationMode>,
    notification: Option<NotificationMode>,
    #[serde(default)]
    add_job_shortcut: Shortcut,
}

impl From<StoredOptions> for Options {
    fn from(stored: StoredOptions) -> Self {
        Self {
            refresh_time_seconds: stored
                .refresh_time_seconds
                .or(stored.refresh_time)
                .unwrap_or(DEFAULT_REFRESH_SECS),
            notification_mode: stored.notification_mode.or(stored.notification).unwrap_or_default(),
            add_job_shortcut: stored.add_job_shortcut,
        }
    }
}

/// Options pages historically stored the refresh time as form text.
fn seconds_from_number_or_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }
    match Raw::deserialize(d)? {
        Raw::Number(n) => Ok(Some(n)),
        Raw::Text(s) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
