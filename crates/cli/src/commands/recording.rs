// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rec health|status|start|stop` - Live recording control via the daemon

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use rec_wire::StartRecordingRequest;

use crate::client::DaemonClient;
use crate::color;
use crate::exit_error::ExitError;
use crate::output::{format_or_json, render_status, OutputFormat};

#[derive(Args)]
pub struct StartArgs {
    /// Channel URL or name (e.g. `twitch.tv/somebody`)
    pub target: String,
    /// Display name for the channel
    #[arg(long)]
    pub channel: Option<String>,
    /// Stream quality (defaults to the daemon's configured quality)
    #[arg(long, short)]
    pub quality: Option<String>,
}

impl StartArgs {
    fn into_request(self) -> StartRecordingRequest {
        StartRecordingRequest { target: self.target, channel_name: self.channel, quality: self.quality }
    }
}

pub async fn health(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await.map_err(ExitError::from)?;
    format_or_json(format, &health, || {
        println!("{} is up at {} ({})", health.service, client.addr(), color::muted(&health.timestamp))
    })
}

pub async fn status(client: &DaemonClient, format: OutputFormat) -> Result<()> {
    let status = client.status().await.map_err(ExitError::from)?;
    format_or_json(format, &status, || print!("{}", render_status(&status, Utc::now())))
}

pub async fn start(client: &DaemonClient, args: StartArgs, format: OutputFormat) -> Result<()> {
    let request = args.into_request();
    let response = client.start(&request).await.map_err(ExitError::from)?;
    format_or_json(format, &response, || {
        println!("Recording {}", color::header(request.channel_name.as_deref().unwrap_or(&request.target)))
    })
}

pub async fn stop(client: &DaemonClient, channel: Option<String>, format: OutputFormat) -> Result<()> {
    let response = client.stop(channel.as_deref()).await.map_err(ExitError::from)?;
    format_or_json(format, &response, || match &channel {
        Some(channel) => println!("Stopped {}", color::header(channel)),
        None => println!("Stopped all recordings"),
    })
}
