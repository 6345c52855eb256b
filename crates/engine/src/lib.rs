// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rec-engine: recording registry, capture supervision, retention, and
//! background agent control

pub mod background;
pub mod finalize;
pub mod registry;
pub mod retention;
pub mod status;
pub mod store;
pub mod supervisor;

pub use background::{BackgroundAgentConfig, BackgroundAgentController};
pub use finalize::{sniff_transport_stream, FinalizeOutcome};
pub use registry::{
    Registry, RegistryError, ReservationToken, ReserveRequest, RunningState, StopTicket,
    TerminationReport,
};
pub use retention::{plan_deletions, ActiveOutputs, RetentionEnforcer, RetentionError, RetentionPlan};
pub use status::{merge_status, MergedStatus};
pub use store::{RecordingStore, MEDIA_EXTENSIONS};
pub use supervisor::{
    Recorder, StartError, StartRequest, StartedRecording, StopOutcome, Supervisor, SupervisorConfig,
};
