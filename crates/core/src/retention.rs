// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention policy over the recordings directory.

use serde::{Deserialize, Serialize};

/// Age and count limits for recorded files. A zero disables the rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionPolicy {
    pub max_age_days: u32,
    pub keep_last_global: u32,
    pub keep_last_per_channel: u32,
}

impl RetentionPolicy {
    /// True when every rule is disabled.
    pub fn is_disabled(&self) -> bool {
        self.max_age_days == 0 && self.keep_last_global == 0 && self.keep_last_per_channel == 0
    }
}

/// Outcome of one retention pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionReport {
    pub deleted: usize,
    pub failed: usize,
    /// Files matched by a rule but held by an active recording
    pub skipped_active: usize,
}
