// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake remuxer for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{RemuxError, Remuxer};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recorded remux call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemuxCall {
    pub input: PathBuf,
    pub output: PathBuf,
}

#[derive(Default)]
struct FakeRemuxState {
    calls: Vec<RemuxCall>,
    fail_with: Option<RemuxError>,
}

/// Fake remuxer.
///
/// On success it copies the input to the output, standing in for a rewritten
/// container.
#[derive(Clone, Default)]
pub struct FakeRemuxer {
    inner: Arc<Mutex<FakeRemuxState>>,
}

impl FakeRemuxer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RemuxCall> {
        self.inner.lock().calls.clone()
    }

    pub fn fail_with(&self, error: Option<RemuxError>) {
        self.inner.lock().fail_with = error;
    }
}

#[async_trait]
impl Remuxer for FakeRemuxer {
    async fn remux(&self, input: &Path, output: &Path) -> Result<(), RemuxError> {
        let fail = {
            let mut state = self.inner.lock();
            state.calls.push(RemuxCall { input: input.to_path_buf(), output: output.to_path_buf() });
            state.fail_with.clone()
        };
        if let Some(err) = fail {
            return Err(err);
        }
        std::fs::copy(input, output).map_err(|e| RemuxError::LaunchFailed(e.to_string()))?;
        Ok(())
    }
}
