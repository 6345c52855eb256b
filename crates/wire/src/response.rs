// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rec_core::{RecordingEntry, RecordingFailure, RecordingHandle};
use serde::{Deserialize, Serialize};

/// Machine-readable `error` values of failed responses
pub mod error_code {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const ALREADY_RECORDING: &str = "already_recording";
    pub const CONCURRENCY_LIMIT_REACHED: &str = "concurrency_limit_reached";
}

/// ISO-8601 UTC timestamp with second precision (`2024-01-02T03:04:05Z`).
pub fn iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// ISO-8601 for a filename timestamp, which is in local time.
pub fn iso8601_local(at: NaiveDateTime) -> String {
    match Local.from_local_datetime(&at).earliest() {
        Some(local) => local.to_rfc3339_opts(SecondsFormat::Secs, false),
        None => at.format("%Y-%m-%dT%H:%M:%S").to_string(),
    }
}

/// `{"ok": false, "error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self { ok: false, error: error.into() }
    }
}

/// `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub timestamp: String,
}

/// One in-flight recording in `/recording/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveRecording {
    pub channel_login: String,
    pub display_name: Option<String>,
    pub state: String,
    pub started_at: String,
    pub output_path: Option<String>,
}

impl From<&RecordingHandle> for ActiveRecording {
    fn from(handle: &RecordingHandle) -> Self {
        Self {
            channel_login: handle.channel_login.to_string(),
            display_name: handle.display_name.clone(),
            state: handle.state.to_string(),
            started_at: iso8601(handle.started_at),
            output_path: handle.output_path.as_ref().map(|p| p.display().to_string()),
        }
    }
}

/// A recent crash surfaced in `/recording/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureItem {
    pub channel_login: String,
    pub code: Option<i32>,
    pub message: String,
    pub at: String,
}

impl From<&RecordingFailure> for FailureItem {
    fn from(failure: &RecordingFailure) -> Self {
        Self {
            channel_login: failure.channel_login.to_string(),
            code: failure.code,
            message: failure.message.clone(),
            at: iso8601(failure.at),
        }
    }
}

/// `GET /recording/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    pub active_recordings: usize,
    /// Includes recordings made by the background agent
    pub any_recording: bool,
    pub badge_channel: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub background_recordings: usize,
    #[serde(default)]
    pub recordings: Vec<ActiveRecording>,
    #[serde(default)]
    pub recent_failures: Vec<FailureItem>,
}

/// One file in `GET /recordings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingItem {
    pub channel_name: String,
    pub filename: String,
    pub path: String,
    pub recorded_at: Option<String>,
}

impl From<&RecordingEntry> for RecordingItem {
    fn from(entry: &RecordingEntry) -> Self {
        Self {
            channel_name: entry.channel_name.clone(),
            filename: entry.filename(),
            path: entry.file_path.display().to_string(),
            recorded_at: entry.recorded_at.map(iso8601_local),
        }
    }
}

/// `GET /recordings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingsResponse {
    pub ok: bool,
    pub recordings: Vec<RecordingItem>,
}

/// `POST /recording/start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartResponse {
    pub ok: bool,
    pub started: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StartResponse {
    pub fn started() -> Self {
        Self { ok: true, started: true, error: None }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self { ok: false, started: false, error: Some(error.into()) }
    }
}

/// `POST /recording/stop`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopResponse {
    pub ok: bool,
    pub stopped: bool,
}

/// `POST /retention/enforce`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionResponse {
    pub ok: bool,
    pub deleted: usize,
    pub failed: usize,
    pub skipped_active: usize,
}
