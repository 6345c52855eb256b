// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON shape of the companion API bodies.

use super::*;
use chrono::{NaiveDate, TimeZone, Utc};
use rec_core::RetentionPolicy;

#[test]
fn start_request_accepts_camel_and_snake_case() {
    let camel: StartRecordingRequest =
        serde_json::from_str(r#"{"target":"twitch.tv/foo","channelName":"Foo","quality":"best"}"#)
            .unwrap();
    let snake: StartRecordingRequest =
        serde_json::from_str(r#"{"target":"twitch.tv/foo","channel_name":"Foo","quality":"best"}"#)
            .unwrap();
    assert_eq!(camel, snake);
    assert_eq!(camel.channel_name.as_deref(), Some("Foo"));
}

#[test]
fn start_request_requires_target() {
    assert!(serde_json::from_str::<StartRecordingRequest>(r#"{"quality":"best"}"#).is_err());
}

#[test]
fn stop_request_fields_are_optional() {
    let empty: StopRecordingRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(empty.channel_login, None);
    let named: StopRecordingRequest = serde_json::from_str(r#"{"channelLogin":"foo"}"#).unwrap();
    assert_eq!(named.channel_login.as_deref(), Some("foo"));
}

#[test]
fn retention_request_overlays_policy() {
    let base = RetentionPolicy { max_age_days: 30, keep_last_global: 10, keep_last_per_channel: 0 };
    let req: RetentionRequest = serde_json::from_str(r#"{"keepLastPerChannel":2}"#).unwrap();
    assert_eq!(
        req.apply(base),
        RetentionPolicy { max_age_days: 30, keep_last_global: 10, keep_last_per_channel: 2 }
    );
}

#[test]
fn start_response_omits_error_on_success() {
    let json = serde_json::to_value(StartResponse::started()).unwrap();
    assert_eq!(json, serde_json::json!({"ok": true, "started": true}));
    let json = serde_json::to_value(StartResponse::rejected("already_recording")).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"ok": false, "started": false, "error": "already_recording"})
    );
}

#[test]
fn iso8601_uses_zulu_seconds() {
    let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(iso8601(at), "2024-01-02T03:04:05Z");
}

#[test]
fn recording_item_from_entry() {
    let entry = rec_core::RecordingEntry {
        file_path: "/rec/foo_2024-01-02_03-04-05.mp4".into(),
        channel_name: "foo".into(),
        recorded_at: Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap().and_hms_opt(3, 4, 5).unwrap()),
    };
    let item = RecordingItem::from(&entry);
    assert_eq!(item.filename, "foo_2024-01-02_03-04-05.mp4");
    assert_eq!(item.path, "/rec/foo_2024-01-02_03-04-05.mp4");
    assert!(item.recorded_at.unwrap().starts_with("2024-01-02T03:04:05"));
}

#[test]
fn undated_entry_serializes_null_recorded_at() {
    let entry = rec_core::RecordingEntry {
        file_path: "/rec/foo.mp4".into(),
        channel_name: "foo".into(),
        recorded_at: None,
    };
    let json = serde_json::to_value(RecordingItem::from(&entry)).unwrap();
    assert_eq!(json["recorded_at"], serde_json::Value::Null);
}
