// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording registry: the single source of truth for in-flight recordings.
//!
//! Every operation runs inside one critical section, so two concurrent starts
//! for the same channel (or a start racing a stop) resolve to exactly one
//! outcome. The registry never touches processes or files.

use parking_lot::Mutex;
use rec_core::{
    ChannelLogin, Clock, ExitReason, RecordingFailure, RecordingHandle, RecordingState,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use thiserror::Error;

/// Crash diagnostics kept for status reporting
pub const FAILURE_HISTORY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("already recording {0}")]
    AlreadyRecording(ChannelLogin),
    #[error("concurrency limit of {limit} recordings reached")]
    ConcurrencyLimitReached { limit: usize },
    #[error("reservation is no longer valid")]
    StaleToken,
}

/// What a caller wants to reserve a slot for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReserveRequest {
    pub channel_login: ChannelLogin,
    pub display_name: Option<String>,
    pub target: String,
    pub quality: String,
}

/// Proof of a reservation; ties later transitions to one specific handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReservationToken {
    channel_login: ChannelLogin,
    generation: u64,
}

impl ReservationToken {
    pub fn channel_login(&self) -> &ChannelLogin {
        &self.channel_login
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of [`Registry::mark_running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningState {
    Running,
    /// A stop arrived while the process was launching; terminate it now
    StopPending,
}

/// Returned when a stop is recorded; the caller signals the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTicket {
    pub channel_login: ChannelLogin,
    pub generation: u64,
}

/// Final bookkeeping for a handle removed by [`Registry::mark_terminated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationReport {
    /// Handle as it was at removal, in its terminal state
    pub handle: RecordingHandle,
    pub reason: ExitReason,
    /// Set for crashes that were not user-initiated
    pub failure: Option<RecordingFailure>,
}

struct RegistryState {
    handles: HashMap<ChannelLogin, RecordingHandle>,
    failures: VecDeque<RecordingFailure>,
    next_generation: u64,
}

impl RegistryState {
    fn handle_for(&mut self, token: &ReservationToken) -> Option<&mut RecordingHandle> {
        self.handles.get_mut(&token.channel_login).filter(|h| h.generation == token.generation)
    }

    fn stop(handle: &mut RecordingHandle) -> Option<StopTicket> {
        if !handle.state.is_active() {
            return None;
        }
        handle.user_stop_requested = true;
        handle.state = RecordingState::Stopping;
        Some(StopTicket { channel_login: handle.channel_login.clone(), generation: handle.generation })
    }
}

/// In-memory registry of active recordings.
pub struct Registry<C: Clock> {
    state: Mutex<RegistryState>,
    /// 0 = unbounded
    limit: usize,
    clock: C,
}

impl<C: Clock> Registry<C> {
    /// Create a registry; `limit` of 0 means no concurrency ceiling.
    pub fn new(limit: usize, clock: C) -> Self {
        Self {
            state: Mutex::new(RegistryState {
                handles: HashMap::new(),
                failures: VecDeque::with_capacity(FAILURE_HISTORY),
                next_generation: 1,
            }),
            limit,
            clock,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        (self.limit > 0).then_some(self.limit)
    }

    /// Atomically check both invariants and insert a `Starting` handle.
    pub fn try_reserve(&self, request: ReserveRequest) -> Result<ReservationToken, RegistryError> {
        let mut state = self.state.lock();
        if state.handles.get(&request.channel_login).is_some_and(|h| h.state.is_active()) {
            return Err(RegistryError::AlreadyRecording(request.channel_login));
        }
        if self.limit > 0 {
            let counted =
                state.handles.values().filter(|h| h.state.counts_toward_limit()).count();
            if counted >= self.limit {
                return Err(RegistryError::ConcurrencyLimitReached { limit: self.limit });
            }
        }

        let generation = state.next_generation;
        state.next_generation += 1;
        let handle = RecordingHandle {
            channel_login: request.channel_login.clone(),
            display_name: request.display_name,
            target: request.target,
            quality: request.quality,
            output_path: None,
            state: RecordingState::Starting,
            started_at: self.clock.now(),
            pid: None,
            user_stop_requested: false,
            generation,
        };
        state.handles.insert(request.channel_login.clone(), handle);
        Ok(ReservationToken { channel_login: request.channel_login, generation })
    }

    /// Attach the launched process and move `Starting → Running`.
    pub fn mark_running(
        &self,
        token: &ReservationToken,
        pid: Option<u32>,
        output_path: PathBuf,
    ) -> Result<RunningState, RegistryError> {
        let mut state = self.state.lock();
        let handle = state.handle_for(token).ok_or(RegistryError::StaleToken)?;
        handle.pid = pid;
        handle.output_path = Some(output_path);
        match handle.state {
            RecordingState::Starting => {
                handle.state = RecordingState::Running;
                Ok(RunningState::Running)
            }
            RecordingState::Stopping => Ok(RunningState::StopPending),
            _ => Err(RegistryError::StaleToken),
        }
    }

    /// Flag `login`'s recording as user-stopped. `None` when nothing is active.
    pub fn request_stop(&self, login: &ChannelLogin) -> Option<StopTicket> {
        let mut state = self.state.lock();
        state.handles.get_mut(login).and_then(RegistryState::stop)
    }

    /// Flag every active recording as user-stopped.
    pub fn request_stop_any(&self) -> Vec<StopTicket> {
        let mut state = self.state.lock();
        let mut tickets: Vec<StopTicket> =
            state.handles.values_mut().filter_map(RegistryState::stop).collect();
        tickets.sort_by_key(|t| t.generation);
        tickets
    }

    /// Remove the handle and record why it ended.
    ///
    /// A prior stop request overrides `reason`: the exit that follows a
    /// terminate signal is never reported as a crash.
    pub fn mark_terminated(
        &self,
        token: &ReservationToken,
        reason: ExitReason,
    ) -> Option<TerminationReport> {
        let mut state = self.state.lock();
        state.handle_for(token)?;
        let mut handle = state.handles.remove(&token.channel_login)?;

        let reason = if handle.user_stop_requested { ExitReason::UserStopped } else { reason };
        handle.state = reason.terminal_state();

        let failure = reason.diagnostic().map(|message| RecordingFailure {
            channel_login: handle.channel_login.clone(),
            code: match &reason {
                ExitReason::Crashed { code, .. } => Some(*code),
                _ => None,
            },
            message: message.to_string(),
            at: self.clock.now(),
        });
        if let Some(failure) = &failure {
            if state.failures.len() == FAILURE_HISTORY {
                state.failures.pop_front();
            }
            state.failures.push_back(failure.clone());
        }
        Some(TerminationReport { handle, reason, failure })
    }

    /// Roll back a reservation whose launch failed.
    pub fn release(&self, token: &ReservationToken) -> bool {
        let mut state = self.state.lock();
        if state.handle_for(token).is_none() {
            return false;
        }
        state.handles.remove(&token.channel_login).is_some()
    }

    /// Snapshot of active handles, oldest first.
    pub fn active_recordings(&self) -> Vec<RecordingHandle> {
        let state = self.state.lock();
        let mut handles: Vec<RecordingHandle> =
            state.handles.values().filter(|h| h.state.is_active()).cloned().collect();
        handles.sort_by_key(|h| (h.started_at, h.generation));
        handles
    }

    pub fn is_recording(&self, login: &ChannelLogin) -> bool {
        self.state.lock().handles.get(login).is_some_and(|h| h.state.is_active())
    }

    /// Output files currently being written.
    pub fn active_output_paths(&self) -> HashSet<PathBuf> {
        let state = self.state.lock();
        state
            .handles
            .values()
            .filter(|h| h.state.is_active())
            .filter_map(|h| h.output_path.clone())
            .collect()
    }

    /// Most recent crash diagnostics, newest last.
    pub fn recent_failures(&self) -> Vec<RecordingFailure> {
        self.state.lock().failures.iter().cloned().collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
