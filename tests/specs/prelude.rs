// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness: a temp state directory, a stub capture engine, and
//! helpers to run `recd` and `rec` against them.

use std::net::TcpListener;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::time::{Duration, Instant};

use tempfile::TempDir;

/// Upper bound for anything the specs wait on
pub const SPEC_WAIT_MAX_MS: u64 = 5000;

/// Records until SIGTERM; answers `--stream-url` with a fake playlist.
const STUB_STREAMLINK: &str = r#"#!/bin/sh
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --output) out="$2"; shift 2 ;;
    --stream-url) echo "https://example.test/$2.m3u8"; exit 0 ;;
    *) shift ;;
  esac
done
printf 'stub capture' > "$out"
trap 'exit 0' TERM INT
while true; do sleep 0.1; done
"#;

/// Env vars that would leak the developer's setup into a run
const SCRUBBED_ENV: &[&str] = &[
    "REC_PORT",
    "REC_AUTH_TOKEN",
    "REC_RECORDINGS_DIR",
    "REC_CONCURRENCY_LIMIT",
    "REC_CAPTURE_ENGINE",
    "REC_TRANSCODE_ENGINE",
    "REC_IO_TIMEOUT_MS",
    "REC_STOP_GRACE_MS",
    "XDG_STATE_HOME",
    "RUST_LOG",
];

pub fn wait_for(max_ms: u64, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(max_ms);
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    check()
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}

fn bin(name: &str) -> PathBuf {
    #[allow(deprecated)]
    assert_cmd::cargo::cargo_bin(name)
}

/// `rec` with no daemon and no configuration.
pub fn cli() -> Run {
    let dir = TempDir::new().unwrap();
    let mut run = Run::new(bin("rec"), &dir.path().join("state"));
    run.keep = Some(dir);
    run
}

pub struct Project {
    dir: TempDir,
    port: u16,
    daemon: Option<Child>,
}

impl Project {
    /// Fresh state directory with a config pointing at the stub engine.
    pub fn empty() -> Self {
        let project = Self { dir: TempDir::new().unwrap(), port: free_port(), daemon: None };
        let stub = project.path().join("bin/streamlink");
        project.file("bin/streamlink", STUB_STREAMLINK);
        std::fs::set_permissions(&stub, std::fs::Permissions::from_mode(0o755)).unwrap();
        project.config("");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path().join("state")
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.path().join("recordings")
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write `config.toml`; `extra` is appended after the base settings.
    pub fn config(&self, extra: &str) {
        let base = format!(
            "recordings_dir = \"{}\"\ncapture_engine_path = \"{}\"\ncompanion_api_port = {}\n",
            self.recordings_dir().display(),
            self.path().join("bin/streamlink").display(),
            self.port,
        );
        self.file("state/config.toml", &format!("{base}{extra}\n"));
    }

    pub fn rec(&self) -> Run {
        Run::new(bin("rec"), &self.state_dir())
    }

    pub fn recd(&self) -> Run {
        Run::new(bin("recd"), &self.state_dir())
    }

    /// Start `recd` in the background and wait for the API to answer.
    pub fn start_daemon(&mut self) {
        let child = self
            .recd()
            .command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .unwrap();
        self.daemon = Some(child);
        let up = wait_for(SPEC_WAIT_MAX_MS, || self.rec().args(&["health"]).run().status.success());
        assert!(up, "recd did not come up on port {}", self.port);
    }

    /// Start `recd` without waiting for the API (e.g. when it is disabled).
    pub fn spawn_daemon(&mut self) {
        let child = self.recd().command.stdout(Stdio::null()).stderr(Stdio::null()).spawn().unwrap();
        self.daemon = Some(child);
    }

    pub fn daemon_pid(&self) -> Option<u32> {
        self.daemon.as_ref().map(Child::id)
    }

    /// SIGTERM the daemon and wait for it to exit.
    pub fn stop_daemon(&mut self) -> ExitStatus {
        let mut child = self.daemon.take().expect("daemon not started");
        Command::new("kill").args(["-TERM", &child.id().to_string()]).status().unwrap();
        let deadline = Instant::now() + Duration::from_millis(SPEC_WAIT_MAX_MS * 2);
        loop {
            if let Some(status) = child.try_wait().unwrap() {
                return status;
            }
            if Instant::now() > deadline {
                let _ = child.kill();
                panic!("recd did not exit after SIGTERM");
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }

    pub fn daemon_log(&self) -> String {
        std::fs::read_to_string(self.state_dir().join("recd.log")).unwrap_or_default()
    }

    /// File names currently in the recordings directory, sorted.
    pub fn recordings(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.recordings_dir())
            .map(|entries| {
                entries.flatten().map(|e| e.file_name().to_string_lossy().into_owned()).collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}

impl Drop for Project {
    fn drop(&mut self) {
        if let Some(mut child) = self.daemon.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// A binary invocation under a scrubbed environment.
pub struct Run {
    command: Command,
    keep: Option<TempDir>,
}

impl Run {
    fn new(program: PathBuf, state_dir: &Path) -> Self {
        let mut command = Command::new(program);
        for var in SCRUBBED_ENV {
            command.env_remove(var);
        }
        command.env("REC_STATE_DIR", state_dir).env("NO_COLOR", "1").env("REC_STOP_GRACE_MS", "1000");
        Self { command, keep: None }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.command.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env(key, value);
        self
    }

    pub fn run(mut self) -> Outcome {
        let output = self.command.output().unwrap();
        drop(self.keep.take());
        Outcome(output)
    }

    pub fn passes(self) -> Outcome {
        let outcome = self.run();
        assert!(outcome.0.status.success(), "expected success:\n{}", outcome.describe());
        outcome
    }

    pub fn fails(self) -> Outcome {
        let outcome = self.run();
        assert!(!outcome.0.status.success(), "expected failure:\n{}", outcome.describe());
        outcome
    }
}

pub struct Outcome(Output);

impl std::ops::Deref for Outcome {
    type Target = Output;

    fn deref(&self) -> &Output {
        &self.0
    }
}

impl Outcome {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.0.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.0.stderr).into_owned()
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout().contains(needle), "stdout missing {needle:?}:\n{}", self.describe());
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr().contains(needle), "stderr missing {needle:?}:\n{}", self.describe());
        self
    }

    pub fn code_is(self, code: i32) -> Self {
        assert_eq!(self.0.status.code(), Some(code), "{}", self.describe());
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.0.stdout).unwrap()
    }

    fn describe(&self) -> String {
        format!("status: {}\nstdout:\n{}\nstderr:\n{}", self.0.status, self.stdout(), self.stderr())
    }
}
