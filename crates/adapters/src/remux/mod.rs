// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remux engine adapter (container rewrite without re-encoding)

mod ffmpeg;

pub use ffmpeg::FfmpegRemuxer;

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeRemuxer, RemuxCall};

use crate::executable::MissingExecutable;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from remux operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemuxError {
    #[error(transparent)]
    MissingExecutable(#[from] MissingExecutable),
    #[error("failed to launch remux engine: {0}")]
    LaunchFailed(String),
    #[error("remux failed (exit {code:?}): {diagnostic}")]
    Failed { code: Option<i32>, diagnostic: String },
}

/// Adapter for the external remux engine
#[async_trait]
pub trait Remuxer: Clone + Send + Sync + 'static {
    /// Copy every stream of `input` into a new container at `output`.
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), RemuxError>;
}
