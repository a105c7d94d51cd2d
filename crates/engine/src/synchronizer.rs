// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup, periodic and on-demand refresh cycles.

use crate::events::EventBus;
use crate::notifier::BuildNotifier;
use crate::scheduler::Scheduler;
use crate::store::{JobStore, PendingRefresh, StoreError};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use yajn_adapters::{JenkinsAdapter, NotifyAdapter};
use yajn_core::{JobChange, Options};
use yajn_storage::Persistence;

/// Drives the job store on a timer and hands each cycle to the notifier.
///
/// The scheduler sits behind an async mutex so an options change stops
/// the old timer and starts the new one as a single step.
pub struct Synchronizer<J, S, N> {
    store: Arc<JobStore<J, S>>,
    notifier: Arc<BuildNotifier<N>>,
    options: watch::Sender<Options>,
    scheduler: Mutex<Scheduler>,
}

impl<J, S, N> Synchronizer<J, S, N>
where
    J: JenkinsAdapter,
    S: Persistence,
    N: NotifyAdapter,
{
    pub fn new(store: Arc<JobStore<J, S>>, notify: N, options: Options) -> Self {
        Self::with_icon(store, notify, options, None)
    }

    pub fn with_icon(
        store: Arc<JobStore<J, S>>,
        notify: N,
        options: Options,
        icon: Option<String>,
    ) -> Self {
        let (options, rx) = watch::channel(options);
        let notifier = Arc::new(BuildNotifier::new(notify, rx).with_icon(icon));
        Self { store, notifier, options, scheduler: Mutex::new(Scheduler::new()) }
    }

    pub fn store(&self) -> &Arc<JobStore<J, S>> {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        self.store.events()
    }

    pub fn options(&self) -> Options {
        self.options.borrow().clone()
    }

    /// Refresh everything once to establish a baseline, then start polling.
    ///
    /// The startup refresh is not announced.
    pub async fn start(&self) {
        let pending = self.store.refresh_all();
        let count = pending.len();
        for outcome in futures_util::future::join_all(pending).await {
            match outcome {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => tracing::warn!(error = %e, "startup refresh not stored"),
                Err(e) => tracing::warn!(error = %e, "startup refresh task failed"),
            }
        }
        tracing::info!(jobs = count, "initial refresh complete");
        self.events().publish_initialized(Arc::new(self.store.snapshot()));

        let options = self.options();
        self.apply_options(options).await;
    }

    /// Adopt new options and re-arm the timer to match.
    ///
    /// Polling is off entirely in `none` mode.
    pub async fn apply_options(&self, options: Options) {
        let mut scheduler = self.scheduler.lock().await;
        self.options.send_replace(options.clone());
        scheduler.stop().await;
        if options.polling_enabled() {
            let store = Arc::clone(&self.store);
            let notifier = Arc::clone(&self.notifier);
            scheduler
                .start(options.refresh_interval(), move || {
                    let pending = store.refresh_all();
                    tracing::debug!(jobs = pending.len(), "periodic refresh");
                    let notifier = Arc::clone(&notifier);
                    tokio::spawn(async move {
                        notifier.notify_pending(pending).await;
                    });
                })
                .await;
        } else {
            tracing::info!("notifications off, polling disabled");
        }
        drop(scheduler);
        self.events().publish_options(options);
    }

    /// Refresh one URL outside the periodic cycle. Not announced.
    pub async fn refresh_one(&self, url: &str) -> Result<JobChange, StoreError> {
        self.store.refresh_one(url).await
    }

    /// Start refreshing every tracked URL; see [`Self::notify`].
    pub fn refresh_all(&self) -> Vec<PendingRefresh> {
        self.store.refresh_all()
    }

    /// Announce the given in-flight refreshes.
    pub async fn notify(&self, pending: Vec<PendingRefresh>) -> usize {
        self.notifier.notify_pending(pending).await
    }

    /// Cancel the timer. In-flight fetches finish on their own.
    pub async fn stop(&self) {
        self.scheduler.lock().await.stop().await;
    }

    pub async fn live_timers(&self) -> usize {
        self.scheduler.lock().await.live_timers()
    }
}

#[cfg(test)]
#[path = "synchronizer_tests.rs"]
mod tests;
