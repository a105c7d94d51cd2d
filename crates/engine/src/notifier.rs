// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turns store outcomes into build notifications.
//!
//! The build number is the only signal that something new happened; status
//! repeats across builds. Views are compared sub-job by sub-job.

use crate::store::PendingRefresh;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::sync::watch;
use yajn_adapters::NotifyAdapter;
use yajn_core::{
    BuildNumber, BuildStatus, JobChange, JobRecord, Notification, NotificationMode, Options,
    TrackedJob,
};

const BACK_TO_STABLE: &str = "Build back to stable!";

/// Notification for one leaf job, or `None` when there is nothing to announce.
pub fn build_notification(
    mode: NotificationMode,
    previous: Option<&JobRecord>,
    current: &JobRecord,
) -> Option<Notification> {
    if mode == NotificationMode::None {
        return None;
    }
    let previous_number = previous.and_then(|p| p.last_build_number.as_ref());
    if previous_number == current.last_build_number.as_ref() {
        return None;
    }
    // No completed build yet
    if current.status == BuildStatus::NotBuilt {
        return None;
    }

    let mut title = format!("Build {}!", current.status.label());
    let past_first_build =
        current.last_build_number.as_ref().is_some_and(BuildNumber::is_after_first);
    if mode == NotificationMode::Unstable
        && current.status == BuildStatus::Success
        && past_first_build
    {
        if previous.is_some_and(|p| p.status == BuildStatus::Success) {
            return None;
        }
        title = BACK_TO_STABLE.to_string();
    }

    let build_url = current.build_url()?;
    Some(Notification::for_build(&build_url, format!("{title} - {}", current.name)))
}

/// Every notification one store outcome calls for.
///
/// A URL whose previous record was never fetched is establishing its
/// baseline and announces nothing.
pub fn notifications_for(mode: NotificationMode, change: &JobChange) -> Vec<Notification> {
    let Some(current) = &change.current else {
        return Vec::new();
    };
    let previous = match &change.previous {
        Some(previous) if !previous.is_placeholder() => previous,
        _ => return Vec::new(),
    };

    match current {
        TrackedJob::Leaf(job) => {
            build_notification(mode, Some(previous.record()), job).into_iter().collect()
        }
        TrackedJob::View(view) => view
            .jobs
            .iter()
            .filter_map(|(key, job)| {
                let before = previous.jobs().and_then(|jobs| jobs.get(key));
                build_notification(mode, before, job)
            })
            .collect(),
    }
}

/// Delivers notifications for refresh outcomes through a [`NotifyAdapter`].
pub struct BuildNotifier<N> {
    adapter: N,
    options: watch::Receiver<Options>,
    icon: Option<String>,
}

impl<N: NotifyAdapter> BuildNotifier<N> {
    pub fn new(adapter: N, options: watch::Receiver<Options>) -> Self {
        Self { adapter, options, icon: None }
    }

    /// Icon attached to every notification.
    pub fn with_icon(mut self, icon: Option<String>) -> Self {
        self.icon = icon;
        self
    }

    fn mode(&self) -> NotificationMode {
        self.options.borrow().notification_mode
    }

    /// Notify for already-resolved outcomes. Returns how many were delivered.
    pub async fn notify_changes(&self, changes: &[JobChange]) -> usize {
        let mode = self.mode();
        let mut delivered = 0;
        for change in changes {
            delivered += self.deliver(mode, change).await;
        }
        delivered
    }

    /// Notify for each refresh as it resolves.
    ///
    /// The mode is read once, when the batch starts; a later change applies
    /// to the next batch.
    pub async fn notify_pending(&self, pending: Vec<PendingRefresh>) -> usize {
        let mode = self.mode();
        if mode == NotificationMode::None {
            tracing::debug!(pending = pending.len(), "notifications off, batch ignored");
            return 0;
        }

        let mut outcomes: FuturesUnordered<_> = pending.into_iter().collect();
        let mut delivered = 0;
        while let Some(outcome) = outcomes.next().await {
            match outcome {
                Ok(Ok(change)) => delivered += self.deliver(mode, &change).await,
                Ok(Err(e)) => tracing::warn!(error = %e, "refresh outcome not stored"),
                Err(e) => tracing::warn!(error = %e, "refresh task failed"),
            }
        }
        delivered
    }

    async fn deliver(&self, mode: NotificationMode, change: &JobChange) -> usize {
        let mut delivered = 0;
        for notification in notifications_for(mode, change) {
            let notification = notification.with_icon(self.icon.clone());
            match self.adapter.notify(&notification).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(id = %notification.id, error = %e, "notification not delivered")
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
