// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recd`: recording daemon with the companion HTTP API.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rec_daemon::{retention_timer, startup, telemetry, Config, LifecycleError, Listener};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "recd", version, about = "Recording daemon")]
struct Args {
    /// Log to stderr instead of the state-directory log file
    #[arg(long)]
    foreground: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("recd: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _telemetry = telemetry::init(&config.log_path, args.foreground);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("recd: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), LifecycleError> {
    let result = startup(&config).await?;
    let mut daemon = result.daemon;
    let shutdown = CancellationToken::new();

    let listener_task = result.listener.map(|tcp| {
        let ctx = Arc::new(daemon.listen_ctx());
        tokio::spawn(Listener::new(tcp, ctx).run(shutdown.clone()))
    });
    let retention_task = daemon.settings.retention.interval().map(|interval| {
        retention_timer::spawn_periodic(
            Arc::clone(&daemon.retention),
            daemon.settings.retention.policy(),
            interval,
            shutdown.clone(),
        )
    });

    wait_for_signal().await?;
    shutdown.cancel();
    for task in [listener_task, retention_task].into_iter().flatten() {
        let _ = task.await;
    }
    daemon.shutdown().await
}

async fn wait_for_signal() -> Result<(), LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result?,
        _ = sigterm.recv() => {}
    }
    info!("shutdown signal received");
    Ok(())
}
