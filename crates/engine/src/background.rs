// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coarse remote control of the background recorder agent.
//!
//! The agent is a separate OS process found by name. Its recordings are not
//! visible to the registry; stopping it is the only way to stop them.

use rec_adapters::ProcessTable;
use rec_core::{BackgroundAgentActionResult, Clock};
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::Instant;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How to find and relaunch the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundAgentConfig {
    pub process_name: String,
    /// Falls back to looking up `process_name` on `PATH`
    pub executable: Option<PathBuf>,
    pub args: Vec<String>,
    /// Wait after terminate before force-killing
    pub stop_grace: Duration,
}

struct KillSummary {
    found: usize,
    stopped: usize,
}

impl KillSummary {
    fn message(&self) -> String {
        match (self.found, self.found - self.stopped) {
            (0, _) => "no background agent was running".to_string(),
            (found, 0) => format!("stopped {found} background agent process(es)"),
            (found, left) => {
                format!("stopped {} of {found} background agent process(es); {left} still running", self.stopped)
            }
        }
    }
}

pub struct BackgroundAgentController<P: ProcessTable, C: Clock> {
    processes: P,
    clock: C,
    config: BackgroundAgentConfig,
}

impl<P: ProcessTable, C: Clock> BackgroundAgentController<P, C> {
    pub fn new(processes: P, clock: C, config: BackgroundAgentConfig) -> Self {
        Self { processes, clock, config }
    }

    /// Stop every agent instance without relaunching.
    pub async fn kill_agent(&self) -> BackgroundAgentActionResult {
        let summary = self.stop_all().await;
        BackgroundAgentActionResult {
            success: summary.found == summary.stopped,
            message: summary.message(),
            stopped_process_count: summary.stopped,
            finished_at: self.clock.now(),
        }
    }

    /// Stop every agent instance, then launch a fresh one.
    pub async fn restart_agent(&self) -> BackgroundAgentActionResult {
        let summary = self.stop_all().await;
        let (success, relaunch) = match self.relaunch().await {
            Ok(pid) => {
                tracing::info!(pid, name = %self.config.process_name, "background agent relaunched");
                (true, format!("relaunched (pid {pid})"))
            }
            Err(e) => {
                tracing::warn!(error = %e, name = %self.config.process_name, "background agent relaunch failed");
                (false, format!("relaunch failed: {e}"))
            }
        };
        BackgroundAgentActionResult {
            success,
            message: format!("{}; {relaunch}", summary.message()),
            stopped_process_count: summary.stopped,
            finished_at: self.clock.now(),
        }
    }

    async fn stop_all(&self) -> KillSummary {
        let processes = self.processes.clone();
        let name = self.config.process_name.clone();
        let pids = tokio::task::spawn_blocking(move || processes.find_by_name(&name))
            .await
            .unwrap_or_default();
        if pids.is_empty() {
            return KillSummary { found: 0, stopped: 0 };
        }

        for &pid in &pids {
            if let Err(e) = self.processes.terminate(pid) {
                tracing::warn!(pid, error = %e, "failed to terminate background agent");
            }
        }
        let mut alive = self.wait_for_exit(&pids, self.config.stop_grace).await;
        if !alive.is_empty() {
            tracing::warn!(?alive, "background agent ignored terminate, killing");
            for &pid in &alive {
                if let Err(e) = self.processes.force_kill(pid) {
                    tracing::warn!(pid, error = %e, "failed to kill background agent");
                }
            }
            alive = self.wait_for_exit(&alive, Duration::from_secs(1)).await;
        }

        let stopped = pids.len() - alive.len();
        tracing::info!(found = pids.len(), stopped, "background agent stop complete");
        KillSummary { found: pids.len(), stopped }
    }

    /// Poll until every pid is gone or `timeout` passes; returns survivors.
    async fn wait_for_exit(&self, pids: &[u32], timeout: Duration) -> Vec<u32> {
        let deadline = Instant::now() + timeout;
        loop {
            let alive: Vec<u32> =
                pids.iter().copied().filter(|pid| self.processes.is_alive(*pid)).collect();
            if alive.is_empty() || Instant::now() >= deadline {
                return alive;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn relaunch(&self) -> Result<u32, String> {
        let program = rec_adapters::locate(&self.config.process_name, self.config.executable.as_deref())
            .map_err(|e| e.to_string())?;
        let processes = self.processes.clone();
        let args = self.config.args.clone();
        tokio::task::spawn_blocking(move || processes.spawn_detached(&program, &args))
            .await
            .map_err(|e| e.to_string())?
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
#[path = "background_tests.rs"]
mod tests;
