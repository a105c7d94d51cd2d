// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` for deliberate failures and leave the
//! process exit to `main()`.

use std::fmt;

/// Bad input: malformed URL, nothing to do.
pub const EXIT_USAGE: i32 = 2;
/// The URL named on the command line is not tracked.
pub const EXIT_NOT_TRACKED: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, message)
    }

    pub fn not_tracked(url: &str) -> Self {
        Self::new(EXIT_NOT_TRACKED, format!("not tracked: {url}"))
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExitError {}
