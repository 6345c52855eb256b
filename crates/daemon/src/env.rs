// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: REC_STATE_DIR > XDG_STATE_HOME/rec > ~/.local/state/rec
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("REC_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("rec"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/rec"))
}

/// Receive timeout for one HTTP request
pub fn io_timeout() -> Duration {
    millis("REC_IO_TIMEOUT_MS").unwrap_or(Duration::from_secs(5))
}

/// Grace period between terminate and kill for capture and agent processes
pub fn stop_grace() -> Duration {
    millis("REC_STOP_GRACE_MS").unwrap_or(Duration::from_secs(5))
}

/// Companion API port. Parsed wide so out-of-range values can be clamped.
pub fn port() -> Option<i64> {
    std::env::var("REC_PORT").ok().and_then(|s| s.trim().parse::<i64>().ok())
}

/// Companion API token. An empty value disables auth.
pub fn auth_token() -> Option<String> {
    std::env::var("REC_AUTH_TOKEN").ok()
}

pub fn recordings_dir() -> Option<PathBuf> {
    non_empty("REC_RECORDINGS_DIR").map(PathBuf::from)
}

pub fn concurrency_limit() -> Option<usize> {
    std::env::var("REC_CONCURRENCY_LIMIT").ok().and_then(|s| s.trim().parse::<usize>().ok())
}

/// Explicit path to the capture engine
pub fn capture_engine() -> Option<PathBuf> {
    non_empty("REC_CAPTURE_ENGINE").map(PathBuf::from)
}

/// Explicit path to the remux engine
pub fn transcode_engine() -> Option<PathBuf> {
    non_empty("REC_TRANSCODE_ENGINE").map(PathBuf::from)
}

fn millis(name: &str) -> Option<Duration> {
    std::env::var(name).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
