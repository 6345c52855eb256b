// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::sync::Arc;

use fs2::FileExt;
use rec_adapters::{FfmpegRemuxer, FileBackgroundStatus, StreamlinkEngine};
use rec_core::SystemClock;
use rec_engine::{ActiveOutputs, RecordingStore, Registry, RetentionEnforcer, Supervisor, SupervisorConfig};
use tokio::net::TcpListener;
use tracing::info;

use crate::settings::Settings;

use super::{Config, DaemonState, DaemonSupervisor, LifecycleError, StartupResult};

/// Start the daemon
pub async fn startup(config: &Config) -> Result<StartupResult, LifecycleError> {
    match startup_inner(config).await {
        Ok(result) => Ok(result),
        Err(e) => {
            // Lock held by another daemon: leave its PID file alone.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

/// Inner startup logic - cleanup_on_failure called if this fails
async fn startup_inner(config: &Config) -> Result<StartupResult, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Use OpenOptions to avoid truncating the file before we hold the lock,
    // which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    // 3. Settings (file, then environment)
    let settings = Settings::resolve(&config.settings_path)?;
    info!(
        recordings_dir = %settings.recordings_dir.display(),
        limit = settings.recording_concurrency_limit,
        "loaded settings"
    );

    // 4. Engine
    let clock = SystemClock;
    let registry = Arc::new(Registry::new(settings.recording_concurrency_limit, clock));
    let supervisor: Arc<DaemonSupervisor> = Arc::new(Supervisor::new(
        StreamlinkEngine::new(settings.capture_engine_path.clone(), crate::env::stop_grace()),
        FfmpegRemuxer::new(settings.transcode_engine_path.clone()),
        clock,
        registry,
        SupervisorConfig {
            recordings_dir: settings.recordings_dir.clone(),
            default_quality: settings.default_quality.clone(),
            output_extension: settings.output_extension.clone(),
        },
    ));
    let store = RecordingStore::new(&settings.recordings_dir).with_extension(&settings.output_extension);
    let active: Arc<dyn ActiveOutputs> = supervisor.clone();
    let retention = Arc::new(RetentionEnforcer::new(store, active, clock));
    let background = Arc::new(FileBackgroundStatus::new(config.background_status_path.clone()));

    // 5. Bind (LAST - only after all validation passes)
    let listener = if settings.companion_api_enabled {
        let port = settings.port();
        let tcp = TcpListener::bind(("0.0.0.0", port))
            .await
            .map_err(|e| LifecycleError::BindFailed(port, e))?;
        info!("companion API listening on http://0.0.0.0:{}", port);
        Some(tcp)
    } else {
        info!("companion API disabled");
        None
    };

    info!("Daemon started");

    Ok(StartupResult {
        daemon: DaemonState {
            config: config.clone(),
            settings,
            lock_file,
            recorder: supervisor,
            retention,
            background,
        },
        listener,
    })
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
