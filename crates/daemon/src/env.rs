// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.

use std::path::PathBuf;
use std::time::Duration;

use yajn_adapters::FeedParserKind;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: YAJN_STATE_DIR > XDG_STATE_HOME/yajn > ~/.local/state/yajn
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("YAJN_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("yajn"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/yajn"))
}

/// HTTP request timeout override
pub fn http_timeout() -> Option<Duration> {
    std::env::var("YAJN_HTTP_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Feed parser override (`permissive` or `strict`); unknown values are ignored
pub fn feed_parser() -> Option<FeedParserKind> {
    std::env::var("YAJN_FEED_PARSER").ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
