// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake capture engine for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CaptureEngine, CaptureError, CaptureExit, CaptureProcess, CaptureRequest};
use crate::executable::MissingExecutable;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Recorded capture engine call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureCall {
    Start { target: String, quality: String, output_path: PathBuf },
    StreamUrl { target: String, quality: String },
}

struct Running {
    exit_tx: Option<oneshot::Sender<CaptureExit>>,
    stop: CancellationToken,
}

struct FakeCaptureState {
    calls: Vec<CaptureCall>,
    missing: bool,
    launch_error: Option<String>,
    stream_url: Result<String, String>,
    output_bytes: Option<Vec<u8>>,
    running: HashMap<String, Running>,
    next_pid: u32,
}

/// Fake capture engine.
///
/// Started captures stay "running" until stopped (exit code 0) or until
/// [`FakeCaptureEngine::exit`] simulates the process ending on its own.
#[derive(Clone)]
pub struct FakeCaptureEngine {
    inner: Arc<Mutex<FakeCaptureState>>,
}

impl Default for FakeCaptureEngine {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeCaptureState {
                calls: Vec::new(),
                missing: false,
                launch_error: None,
                stream_url: Ok("https://video.example/live.m3u8".to_string()),
                output_bytes: None,
                running: HashMap::new(),
                next_pid: 4000,
            })),
        }
    }
}

impl FakeCaptureEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<CaptureCall> {
        self.inner.lock().calls.clone()
    }

    /// Make `locate` fail as if the executable were not installed
    pub fn set_missing(&self, missing: bool) {
        self.inner.lock().missing = missing;
    }

    /// Make the next launches fail
    pub fn set_launch_error(&self, message: Option<&str>) {
        self.inner.lock().launch_error = message.map(str::to_string);
    }

    pub fn set_stream_url(&self, result: Result<&str, &str>) {
        self.inner.lock().stream_url = result.map(str::to_string).map_err(str::to_string);
    }

    /// Bytes written to the output file on launch
    pub fn set_output_bytes(&self, bytes: Option<Vec<u8>>) {
        self.inner.lock().output_bytes = bytes;
    }

    pub fn is_running(&self, target: &str) -> bool {
        self.inner.lock().running.get(target).is_some_and(|r| r.exit_tx.is_some())
    }

    /// Whether a stop was requested for `target`'s most recent capture
    pub fn stop_requested(&self, target: &str) -> bool {
        self.inner.lock().running.get(target).is_some_and(|r| r.stop.is_cancelled())
    }

    /// Simulate the capture for `target` exiting on its own.
    ///
    /// Returns false when no running capture matches.
    pub fn exit(&self, target: &str, code: Option<i32>, stderr: &str) -> bool {
        let tx = self.inner.lock().running.get_mut(target).and_then(|r| r.exit_tx.take());
        match tx {
            Some(tx) => tx
                .send(CaptureExit { code, stdout_tail: String::new(), stderr_tail: stderr.into() })
                .is_ok(),
            None => false,
        }
    }
}

fn missing() -> MissingExecutable {
    MissingExecutable { name: "streamlink".into(), hint: "install streamlink".into() }
}

#[async_trait]
impl CaptureEngine for FakeCaptureEngine {
    fn locate(&self) -> Result<PathBuf, CaptureError> {
        if self.inner.lock().missing {
            return Err(missing().into());
        }
        Ok(PathBuf::from("/fake/bin/streamlink"))
    }

    async fn start(&self, request: &CaptureRequest) -> Result<CaptureProcess, CaptureError> {
        let (pid, stop, exit_rx, output_bytes) = {
            let mut state = self.inner.lock();
            state.calls.push(CaptureCall::Start {
                target: request.target.clone(),
                quality: request.quality.clone(),
                output_path: request.output_path.clone(),
            });
            if state.missing {
                return Err(missing().into());
            }
            if let Some(message) = &state.launch_error {
                return Err(CaptureError::LaunchFailed(message.clone()));
            }
            let pid = state.next_pid;
            state.next_pid += 1;
            let stop = CancellationToken::new();
            let (exit_tx, exit_rx) = oneshot::channel();
            state
                .running
                .insert(request.target.clone(), Running { exit_tx: Some(exit_tx), stop: stop.clone() });
            (pid, stop, exit_rx, state.output_bytes.clone())
        };

        if let Some(bytes) = output_bytes {
            std::fs::write(&request.output_path, bytes)
                .map_err(|e| CaptureError::LaunchFailed(e.to_string()))?;
        }

        // A stop request exits the capture cleanly
        let inner = Arc::clone(&self.inner);
        let target = request.target.clone();
        let token = stop.clone();
        tokio::spawn(async move {
            token.cancelled().await;
            let tx = inner.lock().running.get_mut(&target).and_then(|r| r.exit_tx.take());
            if let Some(tx) = tx {
                let _ = tx.send(CaptureExit { code: Some(0), ..CaptureExit::default() });
            }
        });

        Ok(CaptureProcess { pid: Some(pid), stop, exit: exit_rx })
    }

    async fn resolve_stream_url(
        &self,
        target: &str,
        quality: &str,
    ) -> Result<String, CaptureError> {
        let mut state = self.inner.lock();
        state
            .calls
            .push(CaptureCall::StreamUrl { target: target.to_string(), quality: quality.to_string() });
        if state.missing {
            return Err(missing().into());
        }
        state.stream_url.clone().map_err(CaptureError::StreamUrlFailed)
    }
}
