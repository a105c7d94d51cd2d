// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use yajn_core::Notification;

/// Errors from notify operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for showing build notifications
#[async_trait]
pub trait NotifyAdapter: Clone + Send + Sync + 'static {
    /// Show a notification. Showing an id that was already shown replaces
    /// or drops it; it never produces a second popup.
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Number of delivered ids remembered for deduplication.
const RECENT_IDS: usize = 256;

/// Bounded set of recently delivered notification ids, oldest evicted first.
#[derive(Debug)]
pub(crate) struct RecentIds {
    order: VecDeque<String>,
    seen: HashSet<String>,
    capacity: usize,
}

impl RecentIds {
    pub(crate) fn new(capacity: usize) -> Self {
        Self { order: VecDeque::new(), seen: HashSet::new(), capacity: capacity.max(1) }
    }

    /// Record `id`; returns false when it was already present.
    pub(crate) fn insert(&mut self, id: &str) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        if self.order.len() == self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
        self.order.push_back(id.to_string());
        self.seen.insert(id.to_string());
        true
    }
}

/// Desktop notification adapter using notify-rust.
///
/// On macOS, `notify-rust` looks up a bundle identifier through AppleScript
/// on first use, which blocks forever in a daemon without Automation
/// permissions. The identifier is set up front to skip that lookup.
#[derive(Clone, Debug)]
pub struct DesktopNotifyAdapter {
    recent: Arc<Mutex<RecentIds>>,
}

impl Default for DesktopNotifyAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopNotifyAdapter {
    pub fn new() -> Self {
        #[cfg(target_os = "macos")]
        {
            let _ = mac_notification_sys::set_application("com.apple.Terminal");
        }
        Self { recent: Arc::new(Mutex::new(RecentIds::new(RECENT_IDS))) }
    }
}

#[async_trait]
impl NotifyAdapter for DesktopNotifyAdapter {
    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        if !self.recent.lock().insert(&notification.id) {
            tracing::debug!(id = %notification.id, "notification already shown");
            return Ok(());
        }
        let notification = notification.clone();
        // show() is synchronous; run it on the blocking pool and don't wait.
        tokio::task::spawn_blocking(move || {
            let mut popup = notify_rust::Notification::new();
            popup.summary(&notification.title).body(&notification.message);
            if let Some(icon) = &notification.icon {
                popup.icon(icon);
            }
            match popup.show() {
                Ok(_) => tracing::info!(id = %notification.id, "desktop notification sent"),
                Err(e) => {
                    tracing::warn!(id = %notification.id, error = %e, "desktop notification failed")
                }
            }
        });
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{NotifyAdapter, NotifyError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;
    use std::sync::Arc;
    use yajn_core::Notification;

    #[derive(Default)]
    struct FakeNotifyState {
        shown: Vec<Notification>,
        failing: HashSet<String>,
        attempts: usize,
    }

    /// Fake notification adapter for testing
    #[derive(Clone, Default)]
    pub struct FakeNotifyAdapter {
        inner: Arc<Mutex<FakeNotifyState>>,
    }

    impl FakeNotifyAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Notifications delivered so far
        pub fn shown(&self) -> Vec<Notification> {
            self.inner.lock().shown.clone()
        }

        /// Titles of delivered notifications, in delivery order
        pub fn titles(&self) -> Vec<String> {
            self.inner.lock().shown.iter().map(|n| n.title.clone()).collect()
        }

        /// Deliveries attempted, failed ones included
        pub fn attempts(&self) -> usize {
            self.inner.lock().attempts
        }

        /// Make delivery of `id` fail
        pub fn fail_id(&self, id: impl Into<String>) {
            self.inner.lock().failing.insert(id.into());
        }
    }

    #[async_trait]
    impl NotifyAdapter for FakeNotifyAdapter {
        async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            let mut inner = self.inner.lock();
            inner.attempts += 1;
            if inner.failing.contains(&notification.id) {
                return Err(NotifyError::SendFailed(format!("refused {}", notification.id)));
            }
            inner.shown.push(notification.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeNotifyAdapter;

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
