// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording filename convention: `{channel}_{yyyy-MM-dd_HH-mm-ss}.{ext}`.
//!
//! The filesystem is the only record of completed recordings, so the name
//! carries both the channel and the capture start time.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `chrono` format of the timestamp part (two underscore-delimited segments).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// A completed (or in-flight) recording discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingEntry {
    pub file_path: PathBuf,
    pub channel_name: String,
    /// `None` when the trailing timestamp is missing or unparsable
    pub recorded_at: Option<NaiveDateTime>,
}

impl RecordingEntry {
    /// Build an entry from a path, parsing the file stem.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let (channel_name, recorded_at) = parse_stem(stem);
        Some(Self { file_path: path.to_path_buf(), channel_name, recorded_at })
    }

    pub fn filename(&self) -> String {
        self.file_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
    }
}

/// Make a channel or display name safe for use as the filename prefix.
///
/// Spaces become underscores; path separators and other characters
/// filesystems reject are replaced too.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Format the filename for a recording that starts at `at`.
pub fn format_recording_filename(name: &str, at: NaiveDateTime, ext: &str) -> String {
    format!("{}_{}.{}", sanitize_name(name), at.format(TIMESTAMP_FORMAT), ext.trim_start_matches('.'))
}

/// Split a file stem into `(channel_name, recorded_at)`.
///
/// Fewer than three underscore-delimited segments, or an unparsable trailing
/// timestamp, yield the whole stem as the channel and no timestamp.
pub fn parse_stem(stem: &str) -> (String, Option<NaiveDateTime>) {
    let segments: Vec<&str> = stem.split('_').collect();
    if segments.len() < 3 {
        return (stem.to_string(), None);
    }
    let split = segments.len() - 2;
    let timestamp = segments[split..].join("_");
    match NaiveDateTime::parse_from_str(&timestamp, TIMESTAMP_FORMAT) {
        Ok(at) => (segments[..split].join("_"), Some(at)),
        Err(_) => (stem.to_string(), None),
    }
}

#[cfg(test)]
#[path = "filename_tests.rs"]
mod tests;
