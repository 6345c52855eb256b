// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapters for external I/O: capture engine, remux engine, OS process table,
//! and the background agent's status report.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod background_status;
pub mod capture;
pub mod executable;
pub mod process;
pub mod remux;
mod tail;

pub use background_status::{BackgroundStatusSource, FileBackgroundStatus};
pub use capture::{
    CaptureEngine, CaptureError, CaptureExit, CaptureProcess, CaptureRequest, StreamlinkEngine,
};
pub use executable::{locate, MissingExecutable};
pub use process::{ProcessError, ProcessTable, SystemProcessTable};
pub use remux::{FfmpegRemuxer, RemuxError, Remuxer};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use background_status::FakeBackgroundStatus;
#[cfg(any(test, feature = "test-support"))]
pub use capture::{CaptureCall, FakeCaptureEngine};
#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessTable, ProcessCall};
#[cfg(any(test, feature = "test-support"))]
pub use remux::{FakeRemuxer, RemuxCall};
