// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Owned handle to the periodic refresh timer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

struct Timer {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Counts live timer tasks; decremented when the task ends or is dropped.
struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn new(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs at most one periodic timer.
///
/// `start` stops the previous timer and waits for its task to finish
/// before spawning the next one.
#[derive(Default)]
pub struct Scheduler {
    timer: Option<Timer>,
    live: Arc<AtomicUsize>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `tick` every `period`, first after one full period.
    pub async fn start(&mut self, period: Duration, mut tick: impl FnMut() + Send + 'static) {
        self.stop().await;

        let cancel = CancellationToken::new();
        let guard = LiveGuard::new(&self.live);
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => tick(),
                }
            }
        });
        tracing::debug!(period_secs = period.as_secs(), "refresh timer started");
        self.timer = Some(Timer { cancel, task });
    }

    /// Cancel the timer, if any, and wait for it to wind down.
    pub async fn stop(&mut self) {
        let Some(timer) = self.timer.take() else { return };
        timer.cancel.cancel();
        if let Err(e) = timer.task.await {
            tracing::warn!(error = %e, "refresh timer ended abnormally");
        }
        tracing::debug!("refresh timer stopped");
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Timer tasks currently alive in this scheduler.
    pub fn live_timers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
