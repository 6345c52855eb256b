// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel login normalization.
//!
//! A channel login is the unique key of an in-flight recording. Logins are
//! trimmed and lowercased so `Foo`, ` foo ` and `twitch.tv/FOO` collide.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("channel login is empty")]
    Empty,
    #[error("cannot derive a channel login from target: {0}")]
    UnresolvableTarget(String),
}

/// Normalized (trimmed, lowercase) channel login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelLogin(String);

impl ChannelLogin {
    /// Normalize an explicit channel login or display name.
    pub fn parse(raw: &str) -> Result<Self, ChannelError> {
        let login = raw.trim().trim_start_matches('@').to_lowercase();
        if login.is_empty() {
            return Err(ChannelError::Empty);
        }
        Ok(Self(login))
    }

    /// Derive the login from a capture target such as `twitch.tv/foo`,
    /// `https://www.twitch.tv/Foo?ref=x` or a bare `foo`.
    pub fn from_target(target: &str) -> Result<Self, ChannelError> {
        let trimmed = target.trim();
        let without_scheme = trimmed.split_once("://").map(|(_, rest)| rest).unwrap_or(trimmed);
        let path = without_scheme.split(['?', '#']).next().unwrap_or_default();
        let last = path.split('/').rev().find(|segment| !segment.is_empty());
        match last {
            // A bare host (`twitch.tv`) names no channel
            Some(segment) if segment.contains('.') && !path.contains('/') => {
                Err(ChannelError::UnresolvableTarget(target.to_string()))
            }
            Some(segment) => Self::parse(segment)
                .map_err(|_| ChannelError::UnresolvableTarget(target.to_string())),
            None => Err(ChannelError::UnresolvableTarget(target.to_string())),
        }
    }

    /// Resolve the login for a start request. The target decides; the
    /// display name is used only when the target names no channel.
    pub fn resolve(channel_name: Option<&str>, target: &str) -> Result<Self, ChannelError> {
        Self::from_target(target).or_else(|e| {
            match channel_name.map(str::trim).filter(|name| !name.is_empty()) {
                Some(name) => Self::parse(name),
                None => Err(e),
            }
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelLogin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ChannelLogin {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ChannelLogin {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
