// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rec_adapters::{CaptureCall, FakeCaptureEngine};

#[tokio::test]
async fn falls_back_to_default_quality() {
    let engine = FakeCaptureEngine::new();
    engine.set_stream_url(Ok("https://example.test/live.m3u8"));

    let url = resolve(&engine, " twitch.tv/foo ", None, "720p").await.unwrap();

    assert_eq!(url, "https://example.test/live.m3u8");
    assert_eq!(
        engine.calls(),
        vec![CaptureCall::StreamUrl { target: "twitch.tv/foo".into(), quality: "720p".into() }]
    );
}

#[tokio::test]
async fn explicit_quality_wins() {
    let engine = FakeCaptureEngine::new();
    engine.set_stream_url(Ok("https://example.test/a.m3u8"));

    resolve(&engine, "twitch.tv/foo", Some("audio_only"), "best").await.unwrap();

    assert!(matches!(
        &engine.calls()[0],
        CaptureCall::StreamUrl { quality, .. } if quality == "audio_only"
    ));
}

#[tokio::test]
async fn engine_failure_is_reported() {
    let engine = FakeCaptureEngine::new();
    engine.set_missing(true);

    let err = resolve(&engine, "twitch.tv/foo", None, "best").await.unwrap_err();
    assert!(err.to_string().contains("streamlink"), "unexpected: {err}");
}
