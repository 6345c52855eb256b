// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start, status, and stop through the companion API

use crate::prelude::*;

fn is_recording(project: &Project) -> bool {
    project.rec().args(&["--json", "status"]).passes().json()["any_recording"] == true
}

#[test]
fn start_status_stop_round_trip() {
    let mut project = Project::empty();
    project.start_daemon();

    project.rec().args(&["start", "twitch.tv/foo"]).passes().stdout_has("Recording twitch.tv/foo");

    let status = project.rec().args(&["--json", "status"]).passes().json();
    assert_eq!(status["active_recordings"], 1);
    assert_eq!(status["badge_channel"], "foo");
    assert_eq!(status["recordings"][0]["channel_login"], "foo");

    project.rec().args(&["status"]).passes().stdout_has("foo running");

    project.rec().args(&["stop", "foo"]).passes().stdout_has("Stopped foo");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || !is_recording(&project)));

    let recordings = project.recordings();
    assert_eq!(recordings.len(), 1, "{recordings:?}");
    assert!(recordings[0].starts_with("foo_") && recordings[0].ends_with(".mp4"));
}

#[test]
fn second_start_is_rejected() {
    let mut project = Project::empty();
    project.start_daemon();

    project.rec().args(&["start", "twitch.tv/foo"]).passes();
    project
        .rec()
        .args(&["start", "https://www.twitch.tv/FOO"])
        .fails()
        .code_is(2)
        .stderr_has("already_recording");
}

#[test]
fn concurrency_limit_is_enforced() {
    let mut project = Project::empty();
    project.config("recording_concurrency_limit = 1");
    project.start_daemon();

    project.rec().args(&["start", "twitch.tv/foo"]).passes();
    project
        .rec()
        .args(&["start", "twitch.tv/bar"])
        .fails()
        .code_is(2)
        .stderr_has("concurrency_limit_reached");
}

#[test]
fn missing_capture_engine_is_rejected_with_remediation() {
    let mut project = Project::empty();
    std::fs::remove_file(project.path().join("bin/streamlink")).unwrap();
    project.start_daemon();

    project.rec().args(&["start", "twitch.tv/foo"]).fails().code_is(2).stderr_has("streamlink");
    assert!(!is_recording(&project));
}

#[test]
fn stop_without_channel_stops_everything() {
    let mut project = Project::empty();
    project.start_daemon();
    project.rec().args(&["start", "twitch.tv/foo"]).passes();
    project.rec().args(&["start", "twitch.tv/bar", "--channel", "Bar"]).passes();

    project.rec().args(&["stop"]).passes().stdout_has("Stopped all recordings");
    assert!(wait_for(SPEC_WAIT_MAX_MS, || !is_recording(&project)));
    assert_eq!(project.recordings().len(), 2);
}

#[test]
fn stopping_an_idle_channel_succeeds() {
    let mut project = Project::empty();
    project.start_daemon();

    let out = project.rec().args(&["--json", "stop", "nobody"]).passes();
    assert_eq!(out.json()["stopped"], true);
}

#[test]
fn shutdown_stops_active_recordings() {
    let mut project = Project::empty();
    project.start_daemon();
    project.rec().args(&["start", "twitch.tv/foo"]).passes();

    assert!(project.stop_daemon().success());
    let recordings = project.recordings();
    assert_eq!(recordings.len(), 1, "{recordings:?}");
}

#[test]
fn list_shows_finished_recordings() {
    let mut project = Project::empty();
    project.file("recordings/alpha_2024-01-01_10-00-00.mp4", "x");
    project.file("recordings/beta_2024-03-01_10-00-00.mkv", "x");
    project.file("recordings/notes.txt", "x");
    project.start_daemon();

    let list = project.rec().args(&["--json", "list"]).passes().json();
    let names: Vec<&str> =
        list.as_array().unwrap().iter().map(|r| r["filename"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["beta_2024-03-01_10-00-00.mkv", "alpha_2024-01-01_10-00-00.mp4"]);

    project.rec().args(&["list"]).passes().stdout_has("alpha").stdout_has("2024-03-01 10:00");
}
