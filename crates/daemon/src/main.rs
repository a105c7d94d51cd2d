// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `yajnd`: keeps tracked Jenkins jobs fresh and announces new builds.

use std::process::ExitCode;

use tracing::{error, info};
use yajn_daemon::lifecycle::{acquire_lock, startup};
use yajn_daemon::{logging, Config, LifecycleError};

const USAGE: &str = "usage: yajnd [--foreground]";

#[tokio::main]
async fn main() -> ExitCode {
    let mut foreground = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--foreground" | "-f" => foreground = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            other => {
                eprintln!("yajnd: unexpected argument '{other}'\n{USAGE}");
                return ExitCode::from(2);
            }
        }
    }

    match run(foreground).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("yajnd: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(foreground: bool) -> Result<(), LifecycleError> {
    let config = Config::load()?;
    let lock = acquire_lock(&config)?;
    let _log_guard = logging::init(&config.log_path, foreground)?;
    info!(
        state_dir = %config.state_dir.display(),
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        "starting yajnd"
    );

    let daemon = startup(config, lock)?;
    daemon.run(shutdown_signal()).await
}

/// Resolves on SIGINT, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT"),
        _ = terminate => info!("received SIGTERM"),
    }
}
