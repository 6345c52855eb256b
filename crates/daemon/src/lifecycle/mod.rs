// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rec_adapters::{BackgroundStatusSource, FfmpegRemuxer, StreamlinkEngine};
use rec_core::SystemClock;
use rec_engine::{Recorder, RetentionEnforcer, Supervisor};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::listener::ListenCtx;
use crate::settings::{ConfigError, Settings};

/// Supervisor with the real capture and remux engines
pub type DaemonSupervisor = Supervisor<StreamlinkEngine, FfmpegRemuxer, SystemClock>;

/// Extra time given to exit watchers after the stop grace period
const SHUTDOWN_SLACK: Duration = Duration::from_secs(2);

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/rec)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the user settings file
    pub settings_path: PathBuf,
    /// Status file written by the background agent
    pub background_status_path: PathBuf,
}

impl Config {
    /// Load configuration for the user-level daemon.
    ///
    /// Uses fixed paths under `~/.local/state/rec/` (or `$XDG_STATE_HOME/rec/`).
    pub fn load() -> Result<Self, LifecycleError> {
        Ok(Self::for_state_dir(crate::env::state_dir()?))
    }

    pub fn for_state_dir(state_dir: PathBuf) -> Self {
        Self {
            lock_path: state_dir.join("recd.pid"),
            log_path: state_dir.join("recd.log"),
            settings_path: state_dir.join("config.toml"),
            background_status_path: state_dir.join("background-status.json"),
            state_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    pub settings: Settings,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub recorder: Arc<dyn Recorder>,
    pub retention: Arc<RetentionEnforcer<SystemClock>>,
    pub background: Arc<dyn BackgroundStatusSource>,
}

/// Result of daemon startup: the daemon state plus the bound companion
/// listener, which is `None` when the API is disabled.
pub struct StartupResult {
    pub daemon: DaemonState,
    pub listener: Option<TcpListener>,
}

impl DaemonState {
    /// Shared context for the companion listener.
    pub fn listen_ctx(&self) -> ListenCtx {
        ListenCtx {
            recorder: Arc::clone(&self.recorder),
            retention: Arc::clone(&self.retention),
            retention_policy: self.settings.retention.policy(),
            background: Arc::clone(&self.background),
            auth_token: self.settings.auth_token().map(str::to_string),
            io_timeout: crate::env::io_timeout(),
        }
    }

    /// Stop active recordings, wait for their exit handling, and remove the
    /// PID file.
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");

        let timeout = crate::env::stop_grace() + SHUTDOWN_SLACK;
        if !self.recorder.shutdown(timeout).await {
            warn!(?timeout, "recordings still finalizing at shutdown");
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind companion API on port {0}: {1}")]
    BindFailed(u16, std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
