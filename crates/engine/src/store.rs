// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completed recordings, as found in the recordings directory.

use rec_core::RecordingEntry;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions treated as recordings
pub const MEDIA_EXTENSIONS: &[&str] = &["mp4", "mkv", "ts", "mov", "flv", "m4v"];

/// Directory-backed view of recorded files.
#[derive(Debug, Clone)]
pub struct RecordingStore {
    dir: PathBuf,
    extensions: Vec<String>,
}

impl RecordingStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), extensions: MEDIA_EXTENSIONS.iter().map(|e| e.to_string()).collect() }
    }

    /// Also recognise `ext` (e.g. a configured non-default output extension).
    pub fn with_extension(mut self, ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() && !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn is_recording(&self, path: &Path) -> bool {
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(true, |n| n.starts_with('.'));
        if hidden {
            return false;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(e)))
    }

    /// List recordings, newest first; undated files last. A missing directory
    /// is empty.
    pub fn scan(&self) -> io::Result<Vec<RecordingEntry>> {
        let read_dir = match std::fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item?;
            if !item.file_type()?.is_file() {
                continue;
            }
            let path = item.path();
            if !self.is_recording(&path) {
                continue;
            }
            if let Some(entry) = RecordingEntry::from_path(&path) {
                entries.push(entry);
            }
        }
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    pub fn delete(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

/// Newest first, undated last, then by path for a stable order.
pub fn sort_newest_first(entries: &mut [RecordingEntry]) {
    entries.sort_by(|a, b| {
        b.recorded_at.cmp(&a.recorded_at).then_with(|| a.file_path.cmp(&b.file_path))
    });
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
