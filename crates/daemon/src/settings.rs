// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User settings loaded from `config.toml` in the state directory.
//!
//! Every field is optional; a missing file yields the defaults. Environment
//! variables (see [`crate::env`]) override the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rec_core::RetentionPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8765;
pub const MIN_PORT: u16 = 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub recordings_dir: PathBuf,
    pub capture_engine_path: Option<PathBuf>,
    pub transcode_engine_path: Option<PathBuf>,
    pub companion_api_enabled: bool,
    /// Raw configured port; read through [`Settings::port`]
    pub companion_api_port: i64,
    /// Empty disables bearer auth
    pub companion_api_token: String,
    /// 0 = unbounded
    pub recording_concurrency_limit: usize,
    pub default_quality: String,
    pub output_extension: String,
    pub retention: RetentionSettings,
    pub background_agent: BackgroundAgentSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recordings_dir: default_recordings_dir(),
            capture_engine_path: None,
            transcode_engine_path: None,
            companion_api_enabled: true,
            companion_api_port: i64::from(DEFAULT_PORT),
            companion_api_token: String::new(),
            recording_concurrency_limit: 0,
            default_quality: "best".to_string(),
            output_extension: "mp4".to_string(),
            retention: RetentionSettings::default(),
            background_agent: BackgroundAgentSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionSettings {
    pub max_age_days: u32,
    pub keep_last_global: u32,
    pub keep_last_per_channel: u32,
    /// Seconds between automatic passes; 0 = on demand only
    pub interval_secs: u64,
}

impl RetentionSettings {
    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            max_age_days: self.max_age_days,
            keep_last_global: self.keep_last_global,
            keep_last_per_channel: self.keep_last_per_channel,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        (self.interval_secs > 0).then(|| Duration::from_secs(self.interval_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundAgentSettings {
    pub process_name: String,
    pub executable: Option<PathBuf>,
    pub args: Vec<String>,
}

impl Default for BackgroundAgentSettings {
    fn default() -> Self {
        Self { process_name: "rec-agent".to_string(), executable: None, args: Vec::new() }
    }
}

impl Settings {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        let mut settings: Settings = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        settings.recordings_dir = expand_home(&settings.recordings_dir);
        Ok(settings)
    }

    /// Load from `path` and apply environment overrides.
    pub fn resolve(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = Self::load(path)?;
        settings.apply_env();
        Ok(settings)
    }

    pub fn apply_env(&mut self) {
        if let Some(port) = crate::env::port() {
            self.companion_api_port = port;
        }
        if let Some(token) = crate::env::auth_token() {
            self.companion_api_token = token;
        }
        if let Some(dir) = crate::env::recordings_dir() {
            self.recordings_dir = expand_home(&dir);
        }
        if let Some(limit) = crate::env::concurrency_limit() {
            self.recording_concurrency_limit = limit;
        }
        if let Some(path) = crate::env::capture_engine() {
            self.capture_engine_path = Some(path);
        }
        if let Some(path) = crate::env::transcode_engine() {
            self.transcode_engine_path = Some(path);
        }
    }

    /// Configured port clamped to `[1024, 65535]`.
    pub fn port(&self) -> u16 {
        let clamped = self.companion_api_port.clamp(i64::from(MIN_PORT), i64::from(u16::MAX));
        u16::try_from(clamped).unwrap_or(DEFAULT_PORT)
    }

    /// Bearer token, or `None` when auth is disabled.
    pub fn auth_token(&self) -> Option<&str> {
        let token = self.companion_api_token.as_str();
        (!token.is_empty()).then_some(token)
    }
}

fn default_recordings_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join("Movies").join("Recordings"),
        None => PathBuf::from("Recordings"),
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
