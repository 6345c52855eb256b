// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capture process supervisor.
//!
//! Owns the process controls of every recording. The registry decides whether
//! a recording may start; the supervisor launches it, stops it, and watches for
//! its exit:
//!
//! ```text
//! locate ─► reserve ─► launch ─► mark_running ─► (exit watcher)
//!                        │                          │
//!                        └─ release on failure      └─ mark_terminated ─► finalize
//! ```

use crate::finalize::{finalize, FinalizeOutcome};
use crate::registry::{Registry, RegistryError, ReservationToken, ReserveRequest, RunningState};
use crate::retention::ActiveOutputs;
use async_trait::async_trait;
use parking_lot::Mutex;
use rec_adapters::{
    CaptureEngine, CaptureError, CaptureExit, CaptureProcess, CaptureRequest, MissingExecutable,
    Remuxer,
};
use rec_core::{
    format_recording_filename, ChannelError, ChannelLogin, Clock, ExitReason, RecordingFailure,
    RecordingHandle,
};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Where and how recordings are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub recordings_dir: PathBuf,
    pub default_quality: String,
    /// Output container extension, without the dot
    pub output_extension: String,
}

/// A request to start recording.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartRequest {
    pub target: String,
    pub channel_name: Option<String>,
    pub quality: Option<String>,
}

impl StartRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self { target: target.into(), ..Default::default() }
    }

    rec_core::setters! {
        option {
            channel_name: String,
            quality: String,
        }
    }
}

/// A recording that was launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedRecording {
    pub channel_login: ChannelLogin,
    pub output_path: PathBuf,
    pub pid: Option<u32>,
}

/// Channels a stop request applied to; empty when nothing was active.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopOutcome {
    pub stopped: Vec<ChannelLogin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("target must not be empty")]
    EmptyTarget,
    #[error(transparent)]
    InvalidChannel(#[from] ChannelError),
    #[error(transparent)]
    MissingExecutable(MissingExecutable),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("failed to launch capture engine: {0}")]
    CaptureLaunchFailed(String),
    #[error("cannot create recordings directory {}: {message}", path.display())]
    OutputDir { path: PathBuf, message: String },
}

impl From<CaptureError> for StartError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::MissingExecutable(missing) => Self::MissingExecutable(missing),
            CaptureError::LaunchFailed(message) | CaptureError::StreamUrlFailed(message) => {
                Self::CaptureLaunchFailed(message)
            }
        }
    }
}

impl StartError {
    /// Reason reported to companion clients.
    pub fn reason(&self) -> String {
        match self {
            Self::Registry(RegistryError::AlreadyRecording(_)) => "already_recording".to_string(),
            Self::Registry(RegistryError::ConcurrencyLimitReached { .. }) => {
                "concurrency_limit_reached".to_string()
            }
            other => other.to_string(),
        }
    }

    /// The request itself was malformed, as opposed to being refused.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::EmptyTarget | Self::InvalidChannel(_))
    }
}

/// Object-safe recording control surface used by the HTTP layer.
#[async_trait]
pub trait Recorder: Send + Sync + 'static {
    async fn start(&self, request: StartRequest) -> Result<StartedRecording, StartError>;

    /// Stop `channel`, or every active recording when `None`. Never fails.
    fn stop(&self, channel: Option<&ChannelLogin>) -> StopOutcome;

    fn active_recordings(&self) -> Vec<RecordingHandle>;

    fn recent_failures(&self) -> Vec<RecordingFailure>;

    /// Playable URL for `target` without recording it.
    async fn stream_url(&self, target: &str, quality: Option<&str>) -> Result<String, CaptureError>;

    /// Stop everything and wait up to `timeout` for exit handling to finish.
    async fn shutdown(&self, timeout: Duration) -> bool;
}

/// Derive the exit reason from the process result alone. The registry
/// substitutes `UserStopped` when a stop was requested.
pub(crate) fn exit_reason(exit: &CaptureExit) -> ExitReason {
    match exit.code {
        Some(0) => ExitReason::Finished,
        Some(code) => ExitReason::Crashed {
            code,
            diagnostic: exit
                .diagnostic()
                .unwrap_or_else(|| format!("capture engine exited with code {code}")),
        },
        None => ExitReason::Unknown {
            diagnostic: exit
                .diagnostic()
                .unwrap_or_else(|| "capture engine terminated without an exit code".to_string()),
        },
    }
}

type Controls = Arc<Mutex<HashMap<u64, CancellationToken>>>;

pub struct Supervisor<E: CaptureEngine, R: Remuxer, C: Clock> {
    engine: E,
    remuxer: R,
    clock: C,
    registry: Arc<Registry<C>>,
    config: SupervisorConfig,
    /// Stop tokens keyed by recording generation
    controls: Controls,
    /// Files being remuxed after their handle was released
    finalizing: Arc<Mutex<HashSet<PathBuf>>>,
    tasks: TaskTracker,
}

impl<E: CaptureEngine, R: Remuxer, C: Clock> Supervisor<E, R, C> {
    pub fn new(
        engine: E,
        remuxer: R,
        clock: C,
        registry: Arc<Registry<C>>,
        config: SupervisorConfig,
    ) -> Self {
        Self {
            engine,
            remuxer,
            clock,
            registry,
            config,
            controls: Arc::new(Mutex::new(HashMap::new())),
            finalizing: Arc::new(Mutex::new(HashSet::new())),
            tasks: TaskTracker::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry<C>> {
        &self.registry
    }

    /// Wait until every exit watcher (including finalization) has finished.
    pub async fn wait_idle(&self, timeout: Duration) -> bool {
        self.tasks.close();
        let idle = tokio::time::timeout(timeout, self.tasks.wait()).await.is_ok();
        self.tasks.reopen();
        idle
    }

    fn output_path(&self, name: &str) -> PathBuf {
        let filename =
            format_recording_filename(name, self.clock.local_now(), &self.config.output_extension);
        self.config.recordings_dir.join(filename)
    }

    fn spawn_watcher(&self, token: ReservationToken, exit: oneshot::Receiver<CaptureExit>, output_path: PathBuf) {
        let watcher = ExitWatcher {
            registry: Arc::clone(&self.registry),
            remuxer: self.remuxer.clone(),
            controls: Arc::clone(&self.controls),
            finalizing: Arc::clone(&self.finalizing),
        };
        self.tasks.spawn(watcher.run(token, exit, output_path));
    }
}

#[async_trait]
impl<E: CaptureEngine, R: Remuxer, C: Clock> Recorder for Supervisor<E, R, C> {
    async fn start(&self, request: StartRequest) -> Result<StartedRecording, StartError> {
        let target = request.target.trim().to_string();
        if target.is_empty() {
            return Err(StartError::EmptyTarget);
        }
        let display_name =
            request.channel_name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        let channel_login = ChannelLogin::resolve(display_name.as_deref(), &target)?;
        let quality = request
            .quality
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| self.config.default_quality.clone());

        // Resolve the executable before reserving so a missing tool leaves no handle
        self.engine.locate()?;

        let token = self.registry.try_reserve(ReserveRequest {
            channel_login: channel_login.clone(),
            display_name: display_name.clone(),
            target: target.clone(),
            quality: quality.clone(),
        })?;

        let output_path = self.output_path(display_name.as_deref().unwrap_or(channel_login.as_str()));
        if let Err(e) = tokio::fs::create_dir_all(&self.config.recordings_dir).await {
            self.registry.release(&token);
            return Err(StartError::OutputDir {
                path: self.config.recordings_dir.clone(),
                message: e.to_string(),
            });
        }

        let request = CaptureRequest::new(&target, &quality, &output_path);
        let CaptureProcess { pid, stop, exit } = match self.engine.start(&request).await {
            Ok(process) => process,
            Err(e) => {
                self.registry.release(&token);
                tracing::warn!(channel = %channel_login, error = %e, "capture launch failed");
                return Err(e.into());
            }
        };

        // Control is registered before the handle turns Running so a stop
        // arriving in between always finds it
        self.controls.lock().insert(token.generation(), stop.clone());
        let marked = self.registry.mark_running(&token, pid, output_path.clone());
        self.spawn_watcher(token, exit, output_path.clone());

        match marked {
            Ok(RunningState::Running) => {
                tracing::info!(channel = %channel_login, ?pid, output = %output_path.display(), "recording started");
                Ok(StartedRecording { channel_login, output_path, pid })
            }
            Ok(RunningState::StopPending) => {
                tracing::info!(channel = %channel_login, ?pid, "stop requested during launch");
                stop.cancel();
                Ok(StartedRecording { channel_login, output_path, pid })
            }
            Err(e) => {
                stop.cancel();
                Err(e.into())
            }
        }
    }

    fn stop(&self, channel: Option<&ChannelLogin>) -> StopOutcome {
        // Flag first: the exit that follows the signal must read as user-initiated
        let tickets = match channel {
            Some(login) => self.registry.request_stop(login).into_iter().collect(),
            None => self.registry.request_stop_any(),
        };
        {
            let controls = self.controls.lock();
            for ticket in &tickets {
                if let Some(stop) = controls.get(&ticket.generation) {
                    stop.cancel();
                }
            }
        }
        if tickets.is_empty() {
            tracing::debug!(channel = ?channel.map(ChannelLogin::as_str), "stop: nothing active");
        }
        StopOutcome { stopped: tickets.into_iter().map(|t| t.channel_login).collect() }
    }

    fn active_recordings(&self) -> Vec<RecordingHandle> {
        self.registry.active_recordings()
    }

    fn recent_failures(&self) -> Vec<RecordingFailure> {
        self.registry.recent_failures()
    }

    async fn stream_url(&self, target: &str, quality: Option<&str>) -> Result<String, CaptureError> {
        let quality = quality.filter(|q| !q.trim().is_empty()).unwrap_or(self.config.default_quality.as_str());
        self.engine.resolve_stream_url(target.trim(), quality).await
    }

    async fn shutdown(&self, timeout: Duration) -> bool {
        let outcome = Recorder::stop(self, None);
        if !outcome.stopped.is_empty() {
            tracing::info!(count = outcome.stopped.len(), "stopping recordings for shutdown");
        }
        self.wait_idle(timeout).await
    }
}

impl<E: CaptureEngine, R: Remuxer, C: Clock> ActiveOutputs for Supervisor<E, R, C> {
    fn active_output_paths(&self) -> HashSet<PathBuf> {
        let mut paths = self.registry.active_output_paths();
        paths.extend(self.finalizing.lock().iter().cloned());
        paths
    }
}

/// State moved into the per-recording exit task.
struct ExitWatcher<R: Remuxer, C: Clock> {
    registry: Arc<Registry<C>>,
    remuxer: R,
    controls: Controls,
    finalizing: Arc<Mutex<HashSet<PathBuf>>>,
}

impl<R: Remuxer, C: Clock> ExitWatcher<R, C> {
    async fn run(self, token: ReservationToken, exit: oneshot::Receiver<CaptureExit>, output_path: PathBuf) {
        let exit = exit.await.unwrap_or_else(|_| CaptureExit {
            code: None,
            stdout_tail: String::new(),
            stderr_tail: "capture process handle was lost".to_string(),
        });
        self.controls.lock().remove(&token.generation());

        // Protect the file from retention between handle removal and finalization
        self.finalizing.lock().insert(output_path.clone());
        let Some(report) = self.registry.mark_terminated(&token, exit_reason(&exit)) else {
            tracing::debug!(channel = %token.channel_login(), "exit for a released recording");
            self.finalizing.lock().remove(&output_path);
            return;
        };

        let channel = &report.handle.channel_login;
        match &report.reason {
            ExitReason::UserStopped => tracing::info!(%channel, "recording stopped"),
            ExitReason::Finished => tracing::info!(%channel, "recording finished"),
            ExitReason::Crashed { code, diagnostic } => {
                tracing::warn!(%channel, code, %diagnostic, "capture process crashed")
            }
            ExitReason::Unknown { diagnostic } => {
                tracing::warn!(%channel, %diagnostic, "capture process ended without exit code")
            }
        }

        let clean = matches!(report.reason, ExitReason::UserStopped | ExitReason::Finished);
        if clean && tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            match finalize(&self.remuxer, &output_path).await {
                FinalizeOutcome::Untouched => {}
                FinalizeOutcome::Remuxed => {
                    tracing::info!(%channel, path = %output_path.display(), "recording remuxed")
                }
                FinalizeOutcome::RemuxFailed(message) => {
                    tracing::warn!(%channel, path = %output_path.display(), error = %message, "keeping transport stream")
                }
            }
        }
        self.finalizing.lock().remove(&output_path);
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
