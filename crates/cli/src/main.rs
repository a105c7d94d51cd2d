// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `yajn`: manage the Jenkins jobs the `yajnd` daemon keeps in sync.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod exit_error;
mod output;
mod state;

use std::io::Write;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};

use commands::jobs::{AddArgs, SetArgs};
use commands::options::OptionsCommand;
use exit_error::ExitError;
use output::OutputFormat;
use state::State;

#[derive(Parser)]
#[command(
    name = "yajn",
    version,
    about = "Track Jenkins jobs and views from the command line",
    styles = color::styles()
)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a job or view URL
    Add(AddArgs),
    /// Stop tracking a URL
    Remove {
        url: String,
    },
    /// Track exactly the given URLs
    Set(SetArgs),
    /// Fetch one tracked URL, or all of them, now
    Refresh {
        url: Option<String>,
    },
    /// List tracked jobs with their last build
    List,
    /// Show the badge summary
    Status,
    /// Show or change options
    Options {
        #[command(subcommand)]
        command: OptionsCommand,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit) = e.downcast_ref::<ExitError>() {
                eprintln!("error: {exit}");
                return ExitCode::from(u8::try_from(exit.code).unwrap_or(1));
            }
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Quiet unless `RUST_LOG` asks for output.
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };
    let format = cli.output;
    let state = State::open()?;
    let mut out = std::io::stdout().lock();

    match command {
        Commands::Add(args) => commands::jobs::add(&state.store, args, &mut out).await?,
        Commands::Remove { url } => commands::jobs::remove(&state.store, &url, &mut out)?,
        Commands::Set(args) => {
            let urls = commands::jobs::collect_urls(&args, &mut std::io::stdin().lock())?;
            commands::jobs::set(&state.store, &urls, &mut out)?;
        }
        Commands::Refresh { url } => {
            commands::jobs::refresh(&state.store, url.as_deref(), &mut out).await?
        }
        Commands::List => {
            commands::list::list(&state.store.snapshot(), format, chrono::Utc::now(), &mut out)?
        }
        Commands::Status => commands::list::status(&state.store.snapshot(), format, &mut out)?,
        Commands::Options { command } => {
            commands::options::handle(&state.storage, command, format, &mut out)?
        }
    }
    out.flush()?;
    Ok(())
}
