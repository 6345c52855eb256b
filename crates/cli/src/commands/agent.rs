// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rec agent` - Local control of the background recorder agent
//!
//! Runs in the CLI process: the agent is found in the OS process table, so
//! this works whether or not `recd` is up.

use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use rec_adapters::{ProcessTable, SystemProcessTable};
use rec_core::{BackgroundAgentActionResult, Clock, SystemClock};
use rec_daemon::{BackgroundAgentSettings, Settings};
use rec_engine::{BackgroundAgentConfig, BackgroundAgentController};

use crate::exit_error::{codes, ExitError};
use crate::output::{format_or_json, render_agent_result, OutputFormat};

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentCommand {
    /// Stop every agent process, then launch a fresh one
    Restart,
    /// Stop every agent process
    Kill,
}

pub fn agent_config(settings: &BackgroundAgentSettings, stop_grace: Duration) -> BackgroundAgentConfig {
    BackgroundAgentConfig {
        process_name: settings.process_name.clone(),
        executable: settings.executable.clone(),
        args: settings.args.clone(),
        stop_grace,
    }
}

pub async fn agent(command: AgentCommand, settings: &Settings, format: OutputFormat) -> Result<()> {
    let config = agent_config(&settings.background_agent, rec_daemon::env::stop_grace());
    let controller = BackgroundAgentController::new(SystemProcessTable::new(), SystemClock, config);
    report(run(&controller, command).await, format)
}

async fn run<P: ProcessTable, C: Clock>(
    controller: &BackgroundAgentController<P, C>,
    command: AgentCommand,
) -> BackgroundAgentActionResult {
    match command {
        AgentCommand::Restart => controller.restart_agent().await,
        AgentCommand::Kill => controller.kill_agent().await,
    }
}

fn report(result: BackgroundAgentActionResult, format: OutputFormat) -> Result<()> {
    format_or_json(format, &result, || print!("{}", render_agent_result(&result)))?;
    if !result.success {
        return Err(ExitError::new(codes::FAILURE, "background agent action did not fully succeed").into());
    }
    Ok(())
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
