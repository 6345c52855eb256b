// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording daemon library
//!
//! Settings, lifecycle, and the companion HTTP listener behind `recd`. The
//! CLI reuses [`Config`] and [`Settings`] to find the daemon.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod retention_timer;
pub mod settings;
pub mod telemetry;

pub use lifecycle::{startup, Config, DaemonState, LifecycleError, StartupResult};
pub use listener::{ListenCtx, Listener, SERVICE_NAME};
pub use settings::{BackgroundAgentSettings, ConfigError, RetentionSettings, Settings};
