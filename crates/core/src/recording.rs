// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-flight recording state.
//!
//! ```text
//! Starting ──► Running ──► Stopping ──► Terminated
//!     │            │                       ▲
//!     │            └── exit 0 ─────────────┘
//!     └────────────────── crash ──────────► Failed
//! ```
//!
//! A handle only lives in the registry while it is active; terminal states are
//! reported once and the handle is dropped.

use crate::channel::ChannelLogin;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle state of a recording handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    /// Slot reserved, capture process not yet confirmed
    Starting,
    /// Capture process launched and writing output
    Running,
    /// Stop requested, waiting for the process to exit
    Stopping,
    /// Exited cleanly (user stop or end of stream)
    Terminated,
    /// Exited with an error
    Failed,
}

crate::simple_display! {
    RecordingState {
        Starting => "starting",
        Running => "running",
        Stopping => "stopping",
        Terminated => "terminated",
        Failed => "failed",
    }
}

impl RecordingState {
    /// Holds the per-channel slot.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Starting | Self::Running | Self::Stopping)
    }

    /// Counts toward the global concurrency ceiling.
    pub fn counts_toward_limit(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated | Self::Failed)
    }
}

/// Snapshot of one in-flight recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingHandle {
    pub channel_login: ChannelLogin,
    pub display_name: Option<String>,
    /// Source URL or identifier passed to the capture engine
    pub target: String,
    pub quality: String,
    /// Destination file, known once the process is launched
    pub output_path: Option<PathBuf>,
    pub state: RecordingState,
    pub started_at: DateTime<Utc>,
    pub pid: Option<u32>,
    /// Set before the terminate signal is sent so the exit is not reported as a crash
    pub user_stop_requested: bool,
    /// Distinguishes successive recordings of the same channel
    pub generation: u64,
}

impl RecordingHandle {
    /// Name to show in status badges: display name when set, else the login.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.channel_login.as_str())
    }
}

/// Why a capture process went away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExitReason {
    /// Exit after a user-, retention- or agent-initiated stop
    UserStopped,
    /// Exit code 0 without a stop request (stream ended)
    Finished,
    /// Non-zero exit without a stop request
    Crashed { code: i32, diagnostic: String },
    /// Exit status unavailable (killed by signal, wait failed)
    Unknown { diagnostic: String },
}

crate::simple_display! {
    ExitReason {
        UserStopped => "user_stopped",
        Finished => "finished",
        Crashed { .. } => "crashed",
        Unknown { .. } => "unknown",
    }
}

impl ExitReason {
    /// Terminal state the handle transitions to.
    pub fn terminal_state(&self) -> RecordingState {
        match self {
            Self::UserStopped | Self::Finished => RecordingState::Terminated,
            Self::Crashed { .. } | Self::Unknown { .. } => RecordingState::Failed,
        }
    }

    /// Diagnostic to surface to callers; `None` for clean exits.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Crashed { diagnostic, .. } | Self::Unknown { diagnostic } => Some(diagnostic),
            Self::UserStopped | Self::Finished => None,
        }
    }
}

/// A recording that ended in `Failed`, kept for status reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingFailure {
    pub channel_login: ChannelLogin,
    pub code: Option<i32>,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[cfg(test)]
#[path = "recording_tests.rs"]
mod tests;
