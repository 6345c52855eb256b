// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};

/// Body of `POST /recording/start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRecordingRequest {
    pub target: String,
    #[serde(default, alias = "channel_name", skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// Body of `POST /recording/stop`; an empty body stops every active recording.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopRecordingRequest {
    #[serde(default, alias = "channel_login", skip_serializing_if = "Option::is_none")]
    pub channel_login: Option<String>,
}

/// Body of `POST /retention/enforce`; unset fields fall back to the configured policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetentionRequest {
    #[serde(default, alias = "max_age_days", skip_serializing_if = "Option::is_none")]
    pub max_age_days: Option<u32>,
    #[serde(default, alias = "keep_last_global", skip_serializing_if = "Option::is_none")]
    pub keep_last_global: Option<u32>,
    #[serde(default, alias = "keep_last_per_channel", skip_serializing_if = "Option::is_none")]
    pub keep_last_per_channel: Option<u32>,
}

impl RetentionRequest {
    /// Overlay the request onto a configured policy.
    pub fn apply(&self, base: rec_core::RetentionPolicy) -> rec_core::RetentionPolicy {
        rec_core::RetentionPolicy {
            max_age_days: self.max_age_days.unwrap_or(base.max_age_days),
            keep_last_global: self.keep_last_global.unwrap_or(base.keep_last_global),
            keep_last_per_channel: self.keep_last_per_channel.unwrap_or(base.keep_last_per_channel),
        }
    }
}
