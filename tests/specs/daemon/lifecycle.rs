// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon start/stop lifecycle specs

use crate::prelude::*;

#[test]
fn daemon_writes_pid_and_cleans_up_on_sigterm() {
    let mut project = Project::empty();
    project.start_daemon();

    let pid_file = project.state_dir().join("recd.pid");
    let pid = std::fs::read_to_string(&pid_file).unwrap();
    assert_eq!(pid.trim(), project.daemon_pid().unwrap().to_string());

    let status = project.stop_daemon();
    assert!(status.success(), "recd exited with {status}");
    assert!(!pid_file.exists());
}

#[test]
fn second_daemon_refuses_to_start() {
    let mut project = Project::empty();
    project.start_daemon();

    project.recd().fails().stderr_has("already running");

    // The first daemon is unaffected
    project.rec().args(&["health"]).passes();
}

#[test]
fn health_reports_service() {
    let mut project = Project::empty();
    project.start_daemon();

    let out = project.rec().args(&["--json", "health"]).passes();
    assert_eq!(out.json()["ok"], true);
    assert_eq!(out.json()["service"], "rec-companion");
}

#[test]
fn disabled_api_does_not_listen() {
    let mut project = Project::empty();
    project.config("companion_api_enabled = false");
    project.spawn_daemon();

    let pid_file = project.state_dir().join("recd.pid");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || pid_file.exists()));
    project.rec().args(&["health"]).fails().code_is(3);

    assert!(project.stop_daemon().success());
}

#[test]
fn daemon_logs_listen_address() {
    let mut project = Project::empty();
    project.start_daemon();
    project.stop_daemon();

    let log = project.daemon_log();
    let expected = format!("companion API listening on http://0.0.0.0:{}", project.port());
    assert!(log.contains(&expected), "{log}");
}
