// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{RemuxError, Remuxer};
use crate::tail::{collect_tail, TAIL_BYTES};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

const EXECUTABLE: &str = "ffmpeg";

/// Remuxer that shells out to ffmpeg with stream copy.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRemuxer {
    configured_path: Option<PathBuf>,
}

impl FfmpegRemuxer {
    pub fn new(configured_path: Option<PathBuf>) -> Self {
        Self { configured_path }
    }

    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> =
            ["-hide_banner", "-loglevel", "error", "-y", "-i"].iter().map(OsString::from).collect();
        args.push(input.as_os_str().to_owned());
        args.extend(["-c", "copy", "-map", "0"].iter().map(OsString::from));
        args.push(output.as_os_str().to_owned());
        args
    }
}

#[async_trait]
impl Remuxer for FfmpegRemuxer {
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), RemuxError> {
        let program = crate::executable::locate(EXECUTABLE, self.configured_path.as_deref())?;
        let mut child = Command::new(&program)
            .args(Self::args(input, output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RemuxError::LaunchFailed(e.to_string()))?;

        let stderr = match child.stderr.take() {
            Some(err) => collect_tail(err, TAIL_BYTES).await,
            None => String::new(),
        };
        let status = child.wait().await.map_err(|e| RemuxError::LaunchFailed(e.to_string()))?;
        if status.success() {
            tracing::debug!(input = %input.display(), output = %output.display(), "remux complete");
            return Ok(());
        }
        Err(RemuxError::Failed { code: status.code(), diagnostic: stderr.trim().to_string() })
    }
}

#[cfg(test)]
#[path = "ffmpeg_tests.rs"]
mod tests;
