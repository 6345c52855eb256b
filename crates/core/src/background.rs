// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Records describing the out-of-process background recorder agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a restart or kill of the background agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundAgentActionResult {
    pub success: bool,
    pub message: String,
    pub stopped_process_count: usize,
    pub finished_at: DateTime<Utc>,
}

/// Best-effort view of what the background agent reports it is recording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSnapshot {
    #[serde(alias = "activeChannels")]
    pub active_channels: Vec<String>,
    #[serde(alias = "badgeChannel")]
    pub badge_channel: Option<String>,
}

impl BackgroundSnapshot {
    pub fn recording_count(&self) -> usize {
        self.active_channels.len()
    }

    pub fn is_recording(&self) -> bool {
        !self.active_channels.is_empty()
    }

    /// Badge to show for the agent: its own choice, else its first channel.
    pub fn badge(&self) -> Option<&str> {
        self.badge_channel
            .as_deref()
            .filter(|badge| !badge.is_empty())
            .or_else(|| self.active_channels.first().map(String::as_str))
    }
}

#[cfg(test)]
#[path = "background_tests.rs"]
mod tests;
