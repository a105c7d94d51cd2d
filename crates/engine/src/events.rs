// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed in-process event channels.

use std::sync::Arc;
use tokio::sync::broadcast;
use yajn_core::{JobMap, Options};

const CHANNEL_CAPACITY: usize = 64;

/// One broadcast channel per event kind. Clones share the channels.
///
/// Publishing with no subscribers is not an error. A subscriber that falls
/// behind sees `RecvError::Lagged` and should resync from the store.
#[derive(Clone)]
pub struct EventBus {
    jobs_changed: broadcast::Sender<Arc<JobMap>>,
    options_changed: broadcast::Sender<Options>,
    initialized: broadcast::Sender<Arc<JobMap>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            jobs_changed: broadcast::channel(CHANNEL_CAPACITY).0,
            options_changed: broadcast::channel(CHANNEL_CAPACITY).0,
            initialized: broadcast::channel(1).0,
        }
    }

    /// Full job map after every store mutation.
    pub fn subscribe_jobs(&self) -> broadcast::Receiver<Arc<JobMap>> {
        self.jobs_changed.subscribe()
    }

    pub fn subscribe_options(&self) -> broadcast::Receiver<Options> {
        self.options_changed.subscribe()
    }

    /// Fires once, when the startup refresh has settled.
    pub fn subscribe_initialized(&self) -> broadcast::Receiver<Arc<JobMap>> {
        self.initialized.subscribe()
    }

    pub(crate) fn publish_jobs(&self, jobs: Arc<JobMap>) {
        let _ = self.jobs_changed.send(jobs);
    }

    pub(crate) fn publish_options(&self, options: Options) {
        let _ = self.options_changed.send(options);
    }

    pub(crate) fn publish_initialized(&self, jobs: Arc<JobMap>) {
        let _ = self.initialized.send(jobs);
    }
}
