// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::tempdir;

fn script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("streamlink");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn record_args_disable_ads_and_set_output() {
    let request = CaptureRequest::new("twitch.tv/foo", "best", Path::new("/rec/foo.mp4"));
    assert_eq!(
        StreamlinkEngine::record_args(&request),
        vec![
            "--twitch-disable-ads",
            "--twitch-low-latency",
            "--output",
            "/rec/foo.mp4",
            "twitch.tv/foo",
            "best"
        ]
    );
}

#[test]
fn stream_url_args_use_stream_url_mode() {
    let args = StreamlinkEngine::stream_url_args("twitch.tv/foo", "720p");
    assert!(args.contains(&"--stream-url".to_string()));
    assert_eq!(args.last().unwrap(), "720p");
}

#[tokio::test]
async fn missing_configured_executable_fails_before_spawn() {
    let engine = StreamlinkEngine::new(Some("/nonexistent/streamlink".into()), Duration::ZERO);
    let request = CaptureRequest::new("foo", "best", Path::new("/tmp/x.mp4"));
    let err = engine.start(&request).await.unwrap_err();
    assert!(matches!(err, CaptureError::MissingExecutable(_)));
}

#[tokio::test]
async fn exit_reports_code_and_stderr() {
    let dir = tempdir().unwrap();
    let exe = script(dir.path(), "echo 'error: No playable streams found' >&2\nexit 1");
    let engine = StreamlinkEngine::new(Some(exe), Duration::from_secs(1));
    let request = CaptureRequest::new("foo", "best", &dir.path().join("out.mp4"));

    let process = engine.start(&request).await.unwrap();
    let exit = process.exit.await.unwrap();
    assert_eq!(exit.code, Some(1));
    assert_eq!(exit.diagnostic().unwrap(), "error: No playable streams found");
}

#[tokio::test]
async fn stop_terminates_long_running_capture() {
    let dir = tempdir().unwrap();
    let exe = script(dir.path(), "trap 'exit 0' TERM\nwhile true; do sleep 0.05; done");
    let engine = StreamlinkEngine::new(Some(exe), Duration::from_secs(2));
    let request = CaptureRequest::new("foo", "best", &dir.path().join("out.mp4"));

    let process = engine.start(&request).await.unwrap();
    assert!(process.pid.is_some());
    // Give the shell time to install its trap
    tokio::time::sleep(Duration::from_millis(100)).await;
    process.stop.cancel();
    let exit = tokio::time::timeout(Duration::from_secs(5), process.exit).await.unwrap().unwrap();
    assert_eq!(exit.code, Some(0));
}

#[tokio::test]
async fn stop_escalates_to_kill_after_grace() {
    let dir = tempdir().unwrap();
    let exe = script(dir.path(), "trap '' TERM\nwhile true; do sleep 0.05; done");
    let engine = StreamlinkEngine::new(Some(exe), Duration::from_millis(100));
    let request = CaptureRequest::new("foo", "best", &dir.path().join("out.mp4"));

    let process = engine.start(&request).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    process.stop.cancel();
    let exit = tokio::time::timeout(Duration::from_secs(5), process.exit).await.unwrap().unwrap();
    assert_eq!(exit.code, None);
}

#[tokio::test]
async fn stream_url_success_returns_stdout() {
    let dir = tempdir().unwrap();
    let exe = script(dir.path(), "echo 'https://video.example/playlist.m3u8'");
    let engine = StreamlinkEngine::new(Some(exe), Duration::ZERO);
    let url = engine.resolve_stream_url("foo", "best").await.unwrap();
    assert_eq!(url, "https://video.example/playlist.m3u8");
}

#[tokio::test]
async fn stream_url_failure_reads_stdout_diagnostic() {
    let dir = tempdir().unwrap();
    let exe = script(dir.path(), "echo 'error: channel is offline'\nexit 1");
    let engine = StreamlinkEngine::new(Some(exe), Duration::ZERO);
    let err = engine.resolve_stream_url("foo", "best").await.unwrap_err();
    assert_eq!(err, CaptureError::StreamUrlFailed("error: channel is offline".into()));
}
