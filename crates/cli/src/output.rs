// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text rendering for command results; `--json` prints the wire bodies.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use rec_core::BackgroundAgentActionResult;
use rec_wire::{RecordingItem, RetentionResponse, StatusResponse};
use serde::Serialize;

use crate::color;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text_fn(),
    }
    Ok(())
}

/// Compact elapsed time: "5s", "2m", "1h", "3d"
pub fn format_elapsed(secs: u64) -> String {
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3599 => format!("{}m", secs / 60),
        3600..=86_399 => format!("{}h", secs / 3600),
        _ => format!("{}d", secs / 86_400),
    }
}

/// Time since an RFC 3339 timestamp, or "-" when it does not parse.
pub fn format_age(timestamp: &str, now: DateTime<Utc>) -> String {
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(at) => {
            let secs = (now - at.with_timezone(&Utc)).num_seconds().max(0);
            format_elapsed(secs as u64)
        }
        Err(_) => "-".to_string(),
    }
}

pub fn render_status(status: &StatusResponse, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if !status.any_recording {
        out.push_str("Not recording\n");
    }
    for rec in &status.recordings {
        let name = rec.display_name.as_deref().unwrap_or(&rec.channel_login);
        let _ = writeln!(
            out,
            "{} {} {} {}",
            color::live("●"),
            color::header(name),
            rec.state,
            color::muted(&format!("({})", format_age(&rec.started_at, now))),
        );
        if let Some(path) = &rec.output_path {
            let _ = writeln!(out, "    {}", color::muted(path));
        }
    }
    if status.background_recordings > 0 {
        let _ = writeln!(
            out,
            "{} background agent recording {} channel(s)",
            color::live("●"),
            status.background_recordings
        );
    }
    if let Some(badge) = &status.badge_channel {
        let _ = writeln!(out, "Badge: {}", color::header(badge));
    }
    if !status.recent_failures.is_empty() {
        let _ = writeln!(out, "\n{}", color::context("Recent failures:"));
        for failure in &status.recent_failures {
            let code = failure.code.map_or_else(|| "signal".to_string(), |c| format!("exit {c}"));
            let _ = writeln!(
                out,
                "  {} {} {}: {}",
                color::error("✗"),
                color::header(&failure.channel_login),
                color::muted(&format!("({code}, {} ago)", format_age(&failure.at, now))),
                failure.message,
            );
        }
    }
    out
}

pub fn render_recordings(recordings: &[RecordingItem]) -> String {
    if recordings.is_empty() {
        return "No recordings\n".to_string();
    }
    let width = recordings.iter().map(|r| r.channel_name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for rec in recordings {
        let when = rec
            .recorded_at
            .as_deref()
            .and_then(|at| DateTime::parse_from_rfc3339(at).ok())
            .map_or_else(|| "undated".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        let _ = writeln!(
            out,
            "{}  {:<16}  {}",
            color::header(&format!("{:<width$}", rec.channel_name)),
            when,
            color::muted(&rec.filename),
        );
    }
    out
}

pub fn render_retention(report: &RetentionResponse) -> String {
    let mut out = format!("Deleted {} recording(s)", report.deleted);
    if report.failed > 0 {
        let _ = write!(out, ", {} failed", report.failed);
    }
    if report.skipped_active > 0 {
        let _ = write!(out, ", {} in use skipped", report.skipped_active);
    }
    out.push('\n');
    out
}

pub fn render_agent_result(result: &BackgroundAgentActionResult) -> String {
    let mark = if result.success { "✓".to_string() } else { color::error("✗") };
    format!("{mark} {}\n", result.message)
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
