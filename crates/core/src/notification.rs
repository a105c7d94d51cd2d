// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Desktop notification payload.

use serde::{Deserialize, Serialize};

/// Prefix of every build notification id.
pub const NOTIFICATION_ID_PREFIX: &str = "jenkins-";

/// A notification about one build of one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Stable per build, so re-announcing the same build collides
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Notification {
    /// Notification about the build at `build_url`.
    pub fn for_build(build_url: &str, title: impl Into<String>) -> Self {
        Self {
            id: format!("{NOTIFICATION_ID_PREFIX}{build_url}"),
            title: title.into(),
            message: build_url.to_string(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }
}
