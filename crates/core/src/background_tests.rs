// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn empty_snapshot_is_not_recording() {
    let snapshot = BackgroundSnapshot::default();
    assert!(!snapshot.is_recording());
    assert_eq!(snapshot.recording_count(), 0);
    assert_eq!(snapshot.badge(), None);
}

#[test]
fn badge_falls_back_to_first_channel() {
    let snapshot = BackgroundSnapshot {
        active_channels: vec!["alpha".into(), "beta".into()],
        badge_channel: Some(String::new()),
    };
    assert_eq!(snapshot.badge(), Some("alpha"));
}

#[test]
fn explicit_badge_wins() {
    let snapshot = BackgroundSnapshot {
        active_channels: vec!["alpha".into()],
        badge_channel: Some("Beta".into()),
    };
    assert_eq!(snapshot.badge(), Some("Beta"));
}

#[test]
fn missing_fields_deserialize_to_defaults() {
    let snapshot: BackgroundSnapshot = serde_json::from_str("{}").unwrap();
    assert_eq!(snapshot, BackgroundSnapshot::default());
}
