// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! yajn-engine: job store, change notifier and refresh scheduling

mod events;
mod notifier;
mod scheduler;
mod store;
mod synchronizer;

pub use events::EventBus;
pub use notifier::{build_notification, notifications_for, BuildNotifier};
pub use scheduler::Scheduler;
pub use store::{JobStore, PendingRefresh, StoreError};
pub use synchronizer::Synchronizer;
