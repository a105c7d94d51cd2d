// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build status derived from Jenkins color codes.
//!
//! Jenkins reports job health through a legacy `color` field (`blue`,
//! `red`, `yellow`, ...). A `_anime` suffix marks a build in progress.
//! Colors this crate does not know pass through verbatim so newer servers
//! keep working.

use serde::{Deserialize, Serialize};

/// Suffix Jenkins appends to a color while a build is running.
pub const BUILDING_SUFFIX: &str = "_anime";

/// Status of the last completed build of a job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildStatus {
    Success,
    Unstable,
    Failure,
    Aborted,
    NotBuilt,
    Disabled,
    /// No status known yet (never fetched, or an empty color)
    #[default]
    Unknown,
    /// Color code this client does not recognize, kept as-is
    Other(String),
}

impl BuildStatus {
    /// Split a raw Jenkins color into a status and a building flag.
    pub fn from_color(color: &str) -> (BuildStatus, bool) {
        let building = color.ends_with(BUILDING_SUFFIX);
        let basic = color.strip_suffix(BUILDING_SUFFIX).unwrap_or(color);
        let status = match basic {
            "blue" => BuildStatus::Success,
            "yellow" => BuildStatus::Unstable,
            "red" => BuildStatus::Failure,
            "aborted" => BuildStatus::Aborted,
            "notbuilt" => BuildStatus::NotBuilt,
            "disabled" => BuildStatus::Disabled,
            "" => BuildStatus::Unknown,
            other => BuildStatus::Other(other.to_string()),
        };
        (status, building)
    }

    /// Human-readable label, as shown in notifications and listings.
    pub fn label(&self) -> &str {
        match self {
            BuildStatus::Success => "Success",
            BuildStatus::Unstable => "Unstable",
            BuildStatus::Failure => "Failure",
            BuildStatus::Aborted => "Aborted",
            BuildStatus::NotBuilt => "Not built",
            BuildStatus::Disabled => "Disabled",
            BuildStatus::Unknown => "",
            BuildStatus::Other(raw) => raw,
        }
    }

    /// Icon color used next to the job name.
    pub fn icon(&self) -> &'static str {
        match self {
            BuildStatus::Success => "green",
            BuildStatus::Unstable => "yellow",
            BuildStatus::Failure => "red",
            _ => "grey",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Success)
    }
}

impl From<String> for BuildStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Success" => BuildStatus::Success,
            "Unstable" => BuildStatus::Unstable,
            "Failure" => BuildStatus::Failure,
            "Aborted" => BuildStatus::Aborted,
            "Not built" => BuildStatus::NotBuilt,
            "Disabled" => BuildStatus::Disabled,
            "" => BuildStatus::Unknown,
            _ => BuildStatus::Other(label),
        }
    }
}

impl From<BuildStatus> for String {
    fn from(status: BuildStatus) -> Self {
        status.label().to_string()
    }
}

impl std::fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
