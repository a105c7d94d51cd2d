// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! yajn daemon library
//!
//! State directory resolution and settings are shared with the CLI so both
//! processes work on the same files.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod env;
pub mod lifecycle;
pub mod logging;

pub use config::{Config, DaemonSettings};
pub use lifecycle::{LifecycleError, SETTINGS_FILE};
