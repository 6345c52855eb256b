// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS process table adapter: find processes by name, signal them, and launch
//! detached helpers.

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::path::Path;
use std::process::{Command, Stdio};
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use thiserror::Error;

/// Errors from process table operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessError {
    #[error("failed to signal pid {pid}: {message}")]
    Signal { pid: u32, message: String },
    #[error("failed to launch {program}: {message}")]
    Launch { program: String, message: String },
}

/// Adapter over the host process table
pub trait ProcessTable: Clone + Send + Sync + 'static {
    /// PIDs whose process name matches `name` exactly, excluding this process.
    fn find_by_name(&self, name: &str) -> Vec<u32>;

    /// Request a graceful exit. An already-exited process is not an error.
    fn terminate(&self, pid: u32) -> Result<(), ProcessError>;

    /// Kill without waiting. An already-exited process is not an error.
    fn force_kill(&self, pid: u32) -> Result<(), ProcessError>;

    fn is_alive(&self, pid: u32) -> bool;

    /// Launch `program` detached from this process; returns its PID.
    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<u32, ProcessError>;
}

/// Send SIGTERM to `pid`, treating a vanished process as success.
pub fn terminate_pid(pid: u32) -> Result<(), ProcessError> {
    send(pid, Signal::SIGTERM)
}

fn send(pid: u32, signal: Signal) -> Result<(), ProcessError> {
    let raw = i32::try_from(pid)
        .map_err(|_| ProcessError::Signal { pid, message: "pid out of range".into() })?;
    match kill(Pid::from_raw(raw), signal) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(e) => Err(ProcessError::Signal { pid, message: e.to_string() }),
    }
}

/// Process table backed by sysinfo and POSIX signals.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessTable;

impl SystemProcessTable {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessTable for SystemProcessTable {
    fn find_by_name(&self, name: &str) -> Vec<u32> {
        let refresh = ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet);
        let mut system = System::new();
        system.refresh_processes_specifics(ProcessesToUpdate::All, true, refresh);
        let own = std::process::id();

        let mut pids: Vec<u32> = system
            .processes()
            .iter()
            .filter(|(_, process)| {
                // Kernel-reported names are truncated, so also compare the executable
                process.name() == name
                    || process.exe().and_then(Path::file_name).is_some_and(|f| f == name)
            })
            .map(|(pid, _)| pid.as_u32())
            .filter(|pid| *pid != own)
            .collect();
        pids.sort_unstable();
        pids
    }

    fn terminate(&self, pid: u32) -> Result<(), ProcessError> {
        send(pid, Signal::SIGTERM)
    }

    fn force_kill(&self, pid: u32) -> Result<(), ProcessError> {
        send(pid, Signal::SIGKILL)
    }

    fn is_alive(&self, pid: u32) -> bool {
        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };
        match kill(Pid::from_raw(raw), None) {
            Ok(()) | Err(Errno::EPERM) => true,
            Err(_) => false,
        }
    }

    fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<u32, ProcessError> {
        use std::os::unix::process::CommandExt;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .process_group(0)
            .spawn()
            .map_err(|e| ProcessError::Launch {
                program: program.display().to_string(),
                message: e.to_string(),
            })?;
        let pid = child.id();

        // Reap on exit so the helper never lingers as a zombie
        std::thread::spawn(move || {
            let _ = child.wait();
        });
        Ok(pid)
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ProcessError, ProcessTable};
    use parking_lot::Mutex;
    use std::collections::{BTreeMap, BTreeSet};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    /// Recorded process table call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum ProcessCall {
        Terminate(u32),
        ForceKill(u32),
        Spawn { program: PathBuf, args: Vec<String> },
    }

    struct FakeProcessState {
        processes: BTreeMap<u32, String>,
        ignores_terminate: BTreeSet<u32>,
        calls: Vec<ProcessCall>,
        spawn_error: Option<String>,
        next_pid: u32,
    }

    /// In-memory process table.
    ///
    /// Spawned processes are named after the program's file name.
    #[derive(Clone)]
    pub struct FakeProcessTable {
        inner: Arc<Mutex<FakeProcessState>>,
    }

    impl Default for FakeProcessTable {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeProcessState {
                    processes: BTreeMap::new(),
                    ignores_terminate: BTreeSet::new(),
                    calls: Vec::new(),
                    spawn_error: None,
                    next_pid: 9000,
                })),
            }
        }
    }

    impl FakeProcessTable {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn add_process(&self, pid: u32, name: &str) {
            self.inner.lock().processes.insert(pid, name.to_string());
        }

        /// Make `pid` survive SIGTERM so only a force kill removes it
        pub fn ignore_terminate(&self, pid: u32) {
            self.inner.lock().ignores_terminate.insert(pid);
        }

        pub fn set_spawn_error(&self, message: Option<&str>) {
            self.inner.lock().spawn_error = message.map(str::to_string);
        }

        pub fn calls(&self) -> Vec<ProcessCall> {
            self.inner.lock().calls.clone()
        }

        pub fn running(&self) -> Vec<(u32, String)> {
            self.inner.lock().processes.iter().map(|(pid, name)| (*pid, name.clone())).collect()
        }
    }

    impl ProcessTable for FakeProcessTable {
        fn find_by_name(&self, name: &str) -> Vec<u32> {
            let state = self.inner.lock();
            state.processes.iter().filter(|(_, n)| n.as_str() == name).map(|(p, _)| *p).collect()
        }

        fn terminate(&self, pid: u32) -> Result<(), ProcessError> {
            let mut state = self.inner.lock();
            state.calls.push(ProcessCall::Terminate(pid));
            if !state.ignores_terminate.contains(&pid) {
                state.processes.remove(&pid);
            }
            Ok(())
        }

        fn force_kill(&self, pid: u32) -> Result<(), ProcessError> {
            let mut state = self.inner.lock();
            state.calls.push(ProcessCall::ForceKill(pid));
            state.processes.remove(&pid);
            Ok(())
        }

        fn is_alive(&self, pid: u32) -> bool {
            self.inner.lock().processes.contains_key(&pid)
        }

        fn spawn_detached(&self, program: &Path, args: &[String]) -> Result<u32, ProcessError> {
            let mut state = self.inner.lock();
            state.calls.push(ProcessCall::Spawn { program: program.to_path_buf(), args: args.to_vec() });
            if let Some(message) = &state.spawn_error {
                return Err(ProcessError::Launch {
                    program: program.display().to_string(),
                    message: message.clone(),
                });
            }
            let pid = state.next_pid;
            state.next_pid += 1;
            let name = program.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
            state.processes.insert(pid, name);
            Ok(pid)
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessTable, ProcessCall};

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
