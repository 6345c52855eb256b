// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-demand and periodic retention

use crate::prelude::*;

fn seed(project: &Project) {
    project.file("recordings/a_2024-01-01_00-00-00.mp4", "x");
    project.file("recordings/a_2024-02-01_00-00-00.mp4", "x");
    project.file("recordings/a_2024-03-01_00-00-00.mp4", "x");
    project.file("recordings/b_2024-01-15_00-00-00.mp4", "x");
}

#[test]
fn prune_applies_flag_overrides() {
    let mut project = Project::empty();
    seed(&project);
    project.start_daemon();

    let report = project.rec().args(&["--json", "prune", "--keep-per-channel", "1"]).passes().json();
    assert_eq!(report["deleted"], 2);
    assert_eq!(report["failed"], 0);
    assert_eq!(
        project.recordings(),
        vec!["a_2024-03-01_00-00-00.mp4".to_string(), "b_2024-01-15_00-00-00.mp4".to_string()]
    );
}

#[test]
fn prune_without_policy_deletes_nothing() {
    let mut project = Project::empty();
    seed(&project);
    project.start_daemon();

    project.rec().args(&["prune"]).passes().stdout_has("Deleted 0 recording(s)");
    assert_eq!(project.recordings().len(), 4);
}

#[test]
fn prune_uses_configured_policy() {
    let mut project = Project::empty();
    project.config("[retention]\nkeep_last_global = 1");
    seed(&project);
    project.start_daemon();

    project.rec().args(&["prune"]).passes().stdout_has("Deleted 3 recording(s)");
    assert_eq!(project.recordings(), vec!["a_2024-03-01_00-00-00.mp4".to_string()]);
}

#[test]
fn periodic_retention_runs_on_interval() {
    let mut project = Project::empty();
    project.config("[retention]\nkeep_last_global = 2\ninterval_secs = 1");
    seed(&project);
    project.start_daemon();

    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.recordings().len() == 2));
}

#[test]
fn active_recording_is_never_pruned() {
    let mut project = Project::empty();
    project.file("recordings/live_2099-01-01_00-00-00.mp4", "x");
    project.start_daemon();
    project.rec().args(&["start", "twitch.tv/live"]).passes();
    assert!(wait_for(SPEC_WAIT_MAX_MS, || project.recordings().len() == 2));

    let report = project.rec().args(&["--json", "prune", "--keep-last", "1"]).passes().json();
    assert_eq!(report["deleted"], 0);
    assert_eq!(report["skipped_active"], 1);
    assert_eq!(project.recordings().len(), 2);
}
