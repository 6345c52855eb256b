// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bearer token authentication

use crate::prelude::*;

#[test]
fn configured_token_is_required() {
    let mut project = Project::empty();
    project.config("companion_api_token = \"s3cret\"");
    project.spawn_daemon();

    // `rec` picks the token up from config.toml
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.rec().args(&["health"]).run().status.success()));

    project.rec().args(&["--token", "wrong", "health"]).fails().code_is(4).stderr_has("unauthorized");
    project.rec().args(&["--token", "s3cret", "status"]).passes();
    project.rec().args(&["status"]).env("REC_AUTH_TOKEN", "nope").fails().code_is(4);
}

#[test]
fn empty_token_leaves_api_open() {
    let mut project = Project::empty();
    project.config("companion_api_token = \"\"");
    project.start_daemon();

    project.rec().args(&["--token", "anything", "health"]).passes();
}
