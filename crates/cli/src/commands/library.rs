// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rec list|prune` - Finished recordings on disk

use anyhow::Result;
use clap::Args;
use rec_wire::RetentionRequest;

use crate::client::DaemonClient;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, render_recordings, render_retention, OutputFormat};

/// Overrides for the daemon's configured retention policy; unset flags keep
/// the configured value and 0 disables a rule.
#[derive(Args, Debug, Default)]
pub struct PruneArgs {
    /// Delete recordings older than this many days
    #[arg(long)]
    pub max_age_days: Option<u32>,
    /// Keep only the newest N recordings overall
    #[arg(long)]
    pub keep_last: Option<u32>,
    /// Keep only the newest N recordings per channel
    #[arg(long)]
    pub keep_per_channel: Option<u32>,
}

impl From<PruneArgs> for RetentionRequest {
    fn from(args: PruneArgs) -> Self {
        RetentionRequest {
            max_age_days: args.max_age_days,
            keep_last_global: args.keep_last,
            keep_last_per_channel: args.keep_per_channel,
        }
    }
}

pub async fn list(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let recordings = client.recordings().await.map_err(ExitError::from)?;
    format_or_json(format, &recordings, || print!("{}", render_recordings(&recordings)))
}

pub async fn prune(client: &DaemonClient, args: PruneArgs, format: OutputFormat) -> Result<()> {
    let report = client.enforce_retention(&args.into()).await.map_err(ExitError::from)?;
    format_or_json(format, &report, || print!("{}", render_retention(&report)))
}

#[cfg(test)]
#[path = "library_tests.rs"]
mod tests;
