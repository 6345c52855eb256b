// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rec`: command-line companion for the recording daemon.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod color;
mod commands;
mod endpoint;
mod exit_error;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rec_daemon::{Config, Settings};

use commands::agent::AgentCommand;
use commands::library::PruneArgs;
use commands::recording::StartArgs;
use endpoint::Endpoint;
use exit_error::{codes, ExitError};
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "rec", version, about = "Control the recording daemon", styles = color::styles())]
struct Cli {
    /// Companion API host
    #[arg(long, global = true, default_value = "127.0.0.1")]
    host: String,

    /// Companion API port [default: from config.toml, else 8765]
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Bearer token [default: from config.toml or REC_AUTH_TOKEN]
    #[arg(long, global = true)]
    token: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the companion API is up
    Health,
    /// Show active recordings and recent failures
    Status,
    /// List finished recordings, newest first
    List,
    /// Start recording a channel
    Start(StartArgs),
    /// Stop one channel, or every recording when none is given
    Stop {
        /// Channel login (case-insensitive)
        channel: Option<String>,
    },
    /// Apply the retention policy now
    Prune(PruneArgs),
    /// Control the background recorder agent
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },
    /// Print a playable stream URL without recording
    Url {
        target: String,
        #[arg(long, short)]
        quality: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<ExitError>().map_or(codes::FAILURE, |exit| exit.code);
            eprintln!("{} {e:#}", color::error("error:"));
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let format = if cli.json { OutputFormat::Json } else { OutputFormat::Text };
    let Cli { host, port, token, command, .. } = cli;
    let connect =
        move || Endpoint::resolve(&host, port, token, load_settings).map(|endpoint| endpoint.client());

    match command {
        Commands::Health => commands::recording::health(&connect()?, format).await,
        Commands::Status => commands::recording::status(&connect()?, format).await,
        Commands::Start(args) => commands::recording::start(&connect()?, args, format).await,
        Commands::Stop { channel } => commands::recording::stop(&connect()?, channel, format).await,
        Commands::List => commands::library::list(&connect()?, format).await,
        Commands::Prune(args) => commands::library::prune(&connect()?, args, format).await,
        Commands::Agent { command } => {
            commands::agent::agent(command, &load_settings()?, format).await
        }
        Commands::Url { target, quality } => {
            commands::url::url(&load_settings()?, &target, quality.as_deref(), format).await
        }
    }
}

fn load_settings() -> Result<Settings> {
    let config = Config::load()?;
    Ok(Settings::resolve(&config.settings_path)?)
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
