// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rec url` - Resolve a playable stream URL without recording

use anyhow::Result;
use rec_adapters::{CaptureEngine, StreamlinkEngine};
use rec_daemon::Settings;

use crate::output::{format_or_json, OutputFormat};

pub async fn url(
    settings: &Settings,
    target: &str,
    quality: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let engine =
        StreamlinkEngine::new(settings.capture_engine_path.clone(), rec_daemon::env::stop_grace());
    let url = resolve(&engine, target, quality, &settings.default_quality).await?;
    format_or_json(format, &serde_json::json!({ "url": url }), || println!("{url}"))
}

async fn resolve<E: CaptureEngine>(
    engine: &E,
    target: &str,
    quality: Option<&str>,
    default_quality: &str,
) -> Result<String> {
    let quality = quality.filter(|q| !q.trim().is_empty()).unwrap_or(default_quality);
    Ok(engine.resolve_stream_url(target.trim(), quality).await?)
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
