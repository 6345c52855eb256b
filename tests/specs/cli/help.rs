// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn rec_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("status")
        .stdout_has("start")
        .stdout_has("stop")
        .stdout_has("prune")
        .stdout_has("agent");
}

#[test]
fn rec_agent_help_shows_subcommands() {
    cli().args(&["agent", "--help"]).passes().stdout_has("restart").stdout_has("kill");
}

#[test]
fn rec_without_command_shows_usage() {
    cli().fails().code_is(2).stderr_has("Usage:");
}

#[test]
fn rec_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has("0.1");
}
