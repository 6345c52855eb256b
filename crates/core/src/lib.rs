// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rec-core: domain types for the recording control plane

pub mod macros;

pub mod background;
pub mod channel;
pub mod clock;
pub mod filename;
pub mod recording;
pub mod retention;

pub use background::{BackgroundAgentActionResult, BackgroundSnapshot};
pub use channel::{ChannelError, ChannelLogin};
pub use clock::{Clock, SystemClock};
pub use filename::{format_recording_filename, parse_stem, sanitize_name, RecordingEntry};
pub use recording::{ExitReason, RecordingFailure, RecordingHandle, RecordingState};
pub use retention::{RetentionPolicy, RetentionReport};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
