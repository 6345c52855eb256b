// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording status merged from the registry and the background agent.

use rec_core::{BackgroundSnapshot, RecordingHandle, RecordingState};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedStatus {
    pub active_recordings: usize,
    pub background_recordings: usize,
    pub any_recording: bool,
    /// What to show as the recording indicator
    pub badge_channel: Option<String>,
}

/// Merge local handles with the agent's snapshot.
///
/// The badge prefers the most recently started local `Running` recording,
/// then the agent's own badge, then its first channel.
pub fn merge_status(local: &[RecordingHandle], background: &BackgroundSnapshot) -> MergedStatus {
    let local_badge = local
        .iter()
        .filter(|h| h.state == RecordingState::Running)
        .max_by_key(|h| (h.started_at, h.generation))
        .map(|h| h.label().to_string());

    MergedStatus {
        active_recordings: local.len(),
        background_recordings: background.recording_count(),
        any_recording: !local.is_empty() || background.is_recording(),
        badge_channel: local_badge.or_else(|| background.badge().map(str::to_string)),
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
