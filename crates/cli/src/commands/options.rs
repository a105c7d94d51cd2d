// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Options command handlers

use std::io::Write;

use anyhow::Result;
use clap::Subcommand;
use yajn_core::options::Shortcut;
use yajn_core::{NotificationMode, Options};
use yajn_storage::Persistence;

use crate::exit_error::ExitError;
use crate::output::{format_or_json, OutputFormat};

#[derive(Subcommand)]
pub enum OptionsCommand {
    /// Show the current options
    Show,
    /// Change options; the daemon picks them up on its own
    Set {
        /// Seconds between refreshes
        #[arg(long)]
        refresh_time: Option<u64>,
        /// Which build results to announce: all, unstable, none
        #[arg(long)]
        notification: Option<NotificationMode>,
    },
}

fn shortcut_label(shortcut: &Shortcut) -> String {
    let mut parts = Vec::new();
    if shortcut.ctrl_key {
        parts.push("Ctrl".to_string());
    }
    if shortcut.alt_key {
        parts.push("Alt".to_string());
    }
    if shortcut.shift_key {
        parts.push("Shift".to_string());
    }
    parts.push(shortcut.key.to_uppercase());
    parts.join("+")
}

fn show(options: &Options, format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    format_or_json(format, options, out, |out| {
        writeln!(out, "Refresh every:    {}s", options.refresh_time_seconds)?;
        writeln!(out, "Notifications:    {}", options.notification_mode)?;
        writeln!(out, "Add-job shortcut: {}", shortcut_label(&options.add_job_shortcut))
    })
}

pub fn handle<S: Persistence>(
    storage: &S,
    command: OptionsCommand,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        OptionsCommand::Show => show(&storage.load_options()?, format, out),
        OptionsCommand::Set { refresh_time, notification } => {
            if refresh_time.is_none() && notification.is_none() {
                let hint = "nothing to set (use --refresh-time or --notification)";
                return Err(ExitError::usage(hint).into());
            }
            if refresh_time == Some(0) {
                return Err(ExitError::usage("refresh time must be at least 1 second").into());
            }

            let mut options = storage.load_options()?;
            if let Some(secs) = refresh_time {
                options.refresh_time_seconds = secs;
            }
            if let Some(mode) = notification {
                options.notification_mode = mode;
            }
            storage.save_options(&options)?;
            show(&options, format, out)
        }
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
