// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture engine adapter
//!
//! The capture engine is an external tool (streamlink) that either prints a
//! playable stream URL or writes the stream to a file. A launched capture is
//! represented by a [`CaptureProcess`]: a cancellation token to request a
//! graceful stop and a oneshot that resolves once the process is reaped.

mod streamlink;

pub use streamlink::StreamlinkEngine;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{CaptureCall, FakeCaptureEngine};

use crate::executable::MissingExecutable;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Errors from capture engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error(transparent)]
    MissingExecutable(#[from] MissingExecutable),
    #[error("failed to launch capture engine: {0}")]
    LaunchFailed(String),
    #[error("failed to resolve stream url: {0}")]
    StreamUrlFailed(String),
}

/// What to capture and where to write it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub target: String,
    pub quality: String,
    pub output_path: PathBuf,
}

impl CaptureRequest {
    pub fn new(target: impl Into<String>, quality: impl Into<String>, output_path: &Path) -> Self {
        Self {
            target: target.into(),
            quality: quality.into(),
            output_path: output_path.to_path_buf(),
        }
    }
}

/// How a capture process ended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureExit {
    /// `None` when killed by a signal or the wait failed
    pub code: Option<i32>,
    pub stdout_tail: String,
    pub stderr_tail: String,
}

impl CaptureExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Diagnostic text; the engine reports errors on stdout or stderr.
    pub fn diagnostic(&self) -> Option<String> {
        [&self.stderr_tail, &self.stdout_tail]
            .into_iter()
            .map(|text| text.trim())
            .find(|text| !text.is_empty())
            .map(last_lines)
    }
}

/// Keep the final few lines; progress output before them is noise.
fn last_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}

/// A launched capture.
#[derive(Debug)]
pub struct CaptureProcess {
    pub pid: Option<u32>,
    /// Cancel to send a graceful terminate (escalates to kill after a grace period)
    pub stop: CancellationToken,
    /// Resolves once the process has exited and been reaped
    pub exit: oneshot::Receiver<CaptureExit>,
}

/// Adapter for the external capture engine
#[async_trait]
pub trait CaptureEngine: Clone + Send + Sync + 'static {
    /// Resolve the engine executable.
    ///
    /// Called before a recording slot is reserved so a missing tool never
    /// leaves a half-started recording behind.
    fn locate(&self) -> Result<PathBuf, CaptureError>;

    /// Launch a recording of `request.target` into `request.output_path`.
    async fn start(&self, request: &CaptureRequest) -> Result<CaptureProcess, CaptureError>;

    /// Resolve a playable URL for `target` without recording.
    async fn resolve_stream_url(&self, target: &str, quality: &str)
        -> Result<String, CaptureError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
