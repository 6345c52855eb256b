// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! streamlink-backed capture engine.

use super::{CaptureEngine, CaptureError, CaptureExit, CaptureProcess, CaptureRequest};
use crate::process::terminate_pid;
use crate::tail::{collect_tail, TAIL_BYTES};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

const EXECUTABLE: &str = "streamlink";

/// Flags passed on every invocation: skip ad breaks, lowest latency.
const COMMON_ARGS: &[&str] = &["--twitch-disable-ads", "--twitch-low-latency"];

#[derive(Debug, Clone)]
pub struct StreamlinkEngine {
    configured_path: Option<PathBuf>,
    stop_grace: Duration,
}

impl StreamlinkEngine {
    pub fn new(configured_path: Option<PathBuf>, stop_grace: Duration) -> Self {
        Self { configured_path, stop_grace }
    }

    /// Arguments for a recording invocation.
    pub fn record_args(request: &CaptureRequest) -> Vec<String> {
        let mut args: Vec<String> = COMMON_ARGS.iter().map(|s| s.to_string()).collect();
        args.push("--output".into());
        args.push(request.output_path.display().to_string());
        args.push(request.target.clone());
        args.push(request.quality.clone());
        args
    }

    /// Arguments for a playback URL lookup.
    pub fn stream_url_args(target: &str, quality: &str) -> Vec<String> {
        let mut args: Vec<String> = COMMON_ARGS.iter().map(|s| s.to_string()).collect();
        args.push("--stream-url".into());
        args.push(target.to_string());
        args.push(quality.to_string());
        args
    }
}

#[async_trait]
impl CaptureEngine for StreamlinkEngine {
    fn locate(&self) -> Result<PathBuf, CaptureError> {
        Ok(crate::executable::locate(EXECUTABLE, self.configured_path.as_deref())?)
    }

    async fn start(&self, request: &CaptureRequest) -> Result<CaptureProcess, CaptureError> {
        let program = self.locate()?;
        let mut child = Command::new(&program)
            .args(Self::record_args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CaptureError::LaunchFailed(e.to_string()))?;

        let pid = child.id();
        let stdout_task = child.stdout.take().map(|out| tokio::spawn(collect_tail(out, TAIL_BYTES)));
        let stderr_task = child.stderr.take().map(|err| tokio::spawn(collect_tail(err, TAIL_BYTES)));

        let stop = CancellationToken::new();
        let (exit_tx, exit_rx) = oneshot::channel();
        let grace = self.stop_grace;
        let token = stop.clone();
        let output = request.output_path.clone();

        // Reaper: owns the child until exit so it never becomes a zombie
        tokio::spawn(async move {
            let status = tokio::select! {
                status = child.wait() => status,
                _ = token.cancelled() => {
                    if let Some(pid) = pid {
                        if let Err(e) = terminate_pid(pid) {
                            tracing::warn!(pid, error = %e, "failed to signal capture process");
                        }
                    }
                    match tokio::time::timeout(grace, child.wait()).await {
                        Ok(status) => status,
                        Err(_) => {
                            tracing::warn!(?pid, "capture process ignored terminate, killing");
                            let _ = child.kill().await;
                            child.wait().await
                        }
                    }
                }
            };

            let stdout_tail = match stdout_task {
                Some(task) => task.await.unwrap_or_default(),
                None => String::new(),
            };
            let stderr_tail = match stderr_task {
                Some(task) => task.await.unwrap_or_default(),
                None => String::new(),
            };
            let code = match status {
                Ok(status) => status.code(),
                Err(e) => {
                    tracing::error!(?pid, error = %e, "failed to wait on capture process");
                    None
                }
            };
            tracing::debug!(?pid, ?code, output = %output.display(), "capture process exited");
            let _ = exit_tx.send(CaptureExit { code, stdout_tail, stderr_tail });
        });

        tracing::info!(
            ?pid,
            target = %request.target,
            quality = %request.quality,
            output = %request.output_path.display(),
            "capture process spawned"
        );

        Ok(CaptureProcess { pid, stop, exit: exit_rx })
    }

    async fn resolve_stream_url(
        &self,
        target: &str,
        quality: &str,
    ) -> Result<String, CaptureError> {
        let program = self.locate()?;
        let output = Command::new(&program)
            .args(Self::stream_url_args(target, quality))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| CaptureError::LaunchFailed(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if output.status.success() && stdout.starts_with("http") {
            return Ok(stdout);
        }
        let exit = CaptureExit {
            code: output.status.code(),
            stdout_tail: stdout,
            stderr_tail: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        Err(CaptureError::StreamUrlFailed(
            exit.diagnostic().unwrap_or_else(|| "no playable stream found".to_string()),
        ))
    }
}

#[cfg(test)]
#[path = "streamlink_tests.rs"]
mod tests;
