// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Before/after pair produced by every job store mutation.

use crate::job::TrackedJob;

/// Outcome of one store mutation for a single tracked URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobChange {
    pub url: String,
    pub previous: Option<TrackedJob>,
    /// `None` once the URL is no longer tracked
    pub current: Option<TrackedJob>,
}

impl JobChange {
    pub fn new(
        url: impl Into<String>,
        previous: Option<TrackedJob>,
        current: Option<TrackedJob>,
    ) -> Self {
        Self { url: url.into(), previous, current }
    }

    pub fn is_removal(&self) -> bool {
        self.current.is_none()
    }
}
