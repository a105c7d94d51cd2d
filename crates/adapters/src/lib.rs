// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! yajn-adapters: the Jenkins server and the desktop, behind traits

pub mod jenkins;
pub mod notify;

pub use jenkins::{
    FeedParser, FeedParserKind, FetchError, HttpConfig, HttpJenkinsAdapter, JenkinsAdapter,
    PermissiveFeedParser, StrictFeedParser, UNREACHABLE,
};
pub use notify::{DesktopNotifyAdapter, NotifyAdapter, NotifyError};

#[cfg(any(test, feature = "test-support"))]
pub use jenkins::FakeJenkinsAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
