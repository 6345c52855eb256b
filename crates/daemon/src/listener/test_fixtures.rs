// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for listener tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rec_adapters::{CaptureError, FakeBackgroundStatus, FakeCaptureEngine, FakeRemuxer};
use rec_core::{
    ChannelLogin, FakeClock, RecordingFailure, RecordingHandle, RetentionPolicy, SystemClock,
};
use rec_engine::{
    ActiveOutputs, Recorder, RecordingStore, Registry, RetentionEnforcer, StartError, StartRequest,
    StartedRecording, StopOutcome, Supervisor, SupervisorConfig,
};
use rec_wire::{HttpRequest, HttpResponse};
use tempfile::TempDir;

use super::ListenCtx;

pub(crate) type TestSupervisor = Supervisor<FakeCaptureEngine, FakeRemuxer, FakeClock>;

pub(crate) struct Fixture {
    pub ctx: Arc<ListenCtx>,
    pub supervisor: Arc<TestSupervisor>,
    pub engine: FakeCaptureEngine,
    pub background: FakeBackgroundStatus,
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self::build(None, RetentionPolicy::default())
    }

    pub fn with_token(token: &str) -> Self {
        Self::build(Some(token), RetentionPolicy::default())
    }

    pub fn with_policy(policy: RetentionPolicy) -> Self {
        Self::build(None, policy)
    }

    fn build(token: Option<&str>, retention_policy: RetentionPolicy) -> Self {
        let dir = TempDir::new().unwrap();
        let recordings_dir = dir.path().join("recordings");
        let engine = FakeCaptureEngine::new();
        let clock = FakeClock::new();
        let supervisor = Arc::new(Supervisor::new(
            engine.clone(),
            FakeRemuxer::new(),
            clock.clone(),
            Arc::new(Registry::new(0, clock)),
            SupervisorConfig {
                recordings_dir: recordings_dir.clone(),
                default_quality: "best".into(),
                output_extension: "mp4".into(),
            },
        ));
        let active: Arc<dyn ActiveOutputs> = supervisor.clone();
        let retention =
            Arc::new(RetentionEnforcer::new(RecordingStore::new(recordings_dir), active, SystemClock));
        let background = FakeBackgroundStatus::new();

        let ctx = Arc::new(ListenCtx {
            recorder: supervisor.clone(),
            retention,
            retention_policy,
            background: Arc::new(background.clone()),
            auth_token: token.map(str::to_string),
            io_timeout: Duration::from_millis(500),
        });
        Self { ctx, supervisor, engine, background, dir }
    }

    pub fn recordings_dir(&self) -> PathBuf {
        self.dir.path().join("recordings")
    }

    /// Create a recording file in the recordings directory.
    pub fn touch(&self, name: &str) -> PathBuf {
        std::fs::create_dir_all(self.recordings_dir()).unwrap();
        let path = self.recordings_dir().join(name);
        std::fs::write(&path, b"data").unwrap();
        path
    }

    /// Same context with a recorder that panics on every call.
    pub fn panicking_ctx(&self) -> Arc<ListenCtx> {
        Arc::new(ListenCtx {
            recorder: Arc::new(PanickingRecorder),
            retention: Arc::clone(&self.ctx.retention),
            retention_policy: self.ctx.retention_policy,
            background: Arc::clone(&self.ctx.background),
            auth_token: self.ctx.auth_token.clone(),
            io_timeout: self.ctx.io_timeout,
        })
    }
}

pub(crate) fn request(method: &str, path: &str, body: &str) -> HttpRequest {
    HttpRequest {
        method: method.to_string(),
        path: path.to_string(),
        query: None,
        headers: Vec::new(),
        body: body.as_bytes().to_vec(),
    }
}

pub(crate) fn json(response: &HttpResponse) -> serde_json::Value {
    serde_json::from_slice(&response.body).unwrap()
}

struct PanickingRecorder;

#[async_trait]
impl Recorder for PanickingRecorder {
    async fn start(&self, _request: StartRequest) -> Result<StartedRecording, StartError> {
        panic!("recorder exploded")
    }

    fn stop(&self, _channel: Option<&ChannelLogin>) -> StopOutcome {
        panic!("recorder exploded")
    }

    fn active_recordings(&self) -> Vec<RecordingHandle> {
        panic!("recorder exploded")
    }

    fn recent_failures(&self) -> Vec<RecordingFailure> {
        panic!("recorder exploded")
    }

    async fn stream_url(&self, _target: &str, _quality: Option<&str>) -> Result<String, CaptureError> {
        panic!("recorder exploded")
    }

    async fn shutdown(&self, _timeout: Duration) -> bool {
        true
    }
}
