// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-capture container correction.
//!
//! The capture engine sometimes writes an MPEG transport stream regardless of
//! the output extension. Such files are remuxed into a hidden sibling and then
//! renamed over the original, so an interrupted remux never touches the
//! capture.

use rec_adapters::Remuxer;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Transport stream packet size and sync byte
const TS_PACKET: usize = 188;
const TS_SYNC: u8 = 0x47;
const SNIFF_BYTES: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Container already matches; file untouched
    Untouched,
    Remuxed,
    /// Remux failed; the original file is kept
    RemuxFailed(String),
}

/// True when sync bytes sit at the first three packet boundaries.
pub fn sniff_transport_stream(path: &Path) -> std::io::Result<bool> {
    let mut head = Vec::with_capacity(SNIFF_BYTES);
    std::fs::File::open(path)?.take(SNIFF_BYTES as u64).read_to_end(&mut head)?;
    Ok(is_transport_stream(&head))
}

fn is_transport_stream(head: &[u8]) -> bool {
    (0..3).all(|i| head.get(i * TS_PACKET) == Some(&TS_SYNC))
}

/// `.{stem}.remux.{ext}` next to `path`; hidden so directory scans skip it.
pub fn remux_temp_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!(".{stem}.remux.{}", ext.to_string_lossy()),
        None => format!(".{stem}.remux"),
    };
    path.with_file_name(name)
}

/// Remux `path` in place when it holds a transport stream.
pub async fn finalize<R: Remuxer>(remuxer: &R, path: &Path) -> FinalizeOutcome {
    let sniffed = {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || sniff_transport_stream(&path)).await
    };
    match sniffed {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => return FinalizeOutcome::Untouched,
        Ok(Err(e)) => return FinalizeOutcome::RemuxFailed(format!("cannot read output: {e}")),
        Err(e) => return FinalizeOutcome::RemuxFailed(format!("sniff task failed: {e}")),
    }

    let temp = remux_temp_path(path);
    tracing::info!(path = %path.display(), "transport stream detected, remuxing");
    let result = match remuxer.remux(path, &temp).await {
        Ok(()) => tokio::fs::rename(&temp, path).await.map_err(|e| format!("rename failed: {e}")),
        Err(e) => Err(e.to_string()),
    };
    match result {
        Ok(()) => FinalizeOutcome::Remuxed,
        Err(message) => {
            let _ = tokio::fs::remove_file(&temp).await;
            tracing::warn!(path = %path.display(), error = %message, "remux failed, keeping original");
            FinalizeOutcome::RemuxFailed(message)
        }
    }
}

#[cfg(test)]
#[path = "finalize_tests.rs"]
mod tests;
