// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI behavior when no daemon is listening

use crate::prelude::*;

#[test]
fn status_without_daemon_exits_not_running() {
    let project = Project::empty();
    project.rec().args(&["status"]).fails().code_is(3).stderr_has("not running");
}

#[test]
fn url_resolves_locally_without_daemon() {
    let project = Project::empty();
    project
        .rec()
        .args(&["url", "twitch.tv/foo", "--quality", "720p"])
        .passes()
        .stdout_has("https://example.test/twitch.tv/foo.m3u8");
}

#[test]
fn agent_kill_with_nothing_running_succeeds() {
    let project = Project::empty();
    project.config("[background_agent]\nprocess_name = \"rec-test-agent-that-does-not-exist\"");

    let out = project.rec().args(&["--json", "agent", "kill"]).passes();
    assert_eq!(out.json()["success"], true);
    assert_eq!(out.json()["stopped_process_count"], 0);
}

#[test]
fn invalid_config_is_reported() {
    let project = Project::empty();
    project.file("state/config.toml", "companion_api_port = [");

    project.rec().args(&["status"]).fails().code_is(1).stderr_has("config.toml");
}
