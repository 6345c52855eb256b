// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status reported by the background recorder agent.
//!
//! The agent periodically rewrites a small JSON file. A missing, stale, or
//! unreadable file reads as "not recording".

use async_trait::async_trait;
use rec_core::BackgroundSnapshot;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Reports older than this are ignored
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(30);

/// Source of the background agent's recording status
#[async_trait]
pub trait BackgroundStatusSource: Send + Sync + 'static {
    async fn snapshot(&self) -> BackgroundSnapshot;
}

/// Reads the agent's status file.
#[derive(Debug, Clone)]
pub struct FileBackgroundStatus {
    path: PathBuf,
    max_age: Duration,
}

impl FileBackgroundStatus {
    pub fn new(path: PathBuf) -> Self {
        Self { path, max_age: DEFAULT_MAX_AGE }
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    async fn read(&self) -> Option<BackgroundSnapshot> {
        let meta = tokio::fs::metadata(&self.path).await.ok()?;
        let modified = meta.modified().ok()?;
        // Clock skew (mtime in the future) counts as fresh
        let age = SystemTime::now().duration_since(modified).unwrap_or_default();
        if age > self.max_age {
            tracing::debug!(path = %self.path.display(), ?age, "background status is stale");
            return None;
        }
        let bytes = tokio::fs::read(&self.path).await.ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "unparsable background status");
                None
            }
        }
    }
}

#[async_trait]
impl BackgroundStatusSource for FileBackgroundStatus {
    async fn snapshot(&self) -> BackgroundSnapshot {
        self.read().await.unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::BackgroundStatusSource;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use rec_core::BackgroundSnapshot;
    use std::sync::Arc;

    /// Settable background status for testing
    #[derive(Clone, Default)]
    pub struct FakeBackgroundStatus {
        inner: Arc<Mutex<BackgroundSnapshot>>,
    }

    impl FakeBackgroundStatus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set(&self, channels: &[&str], badge: Option<&str>) {
            *self.inner.lock() = BackgroundSnapshot {
                active_channels: channels.iter().map(|c| c.to_string()).collect(),
                badge_channel: badge.map(str::to_string),
            };
        }
    }

    #[async_trait]
    impl BackgroundStatusSource for FakeBackgroundStatus {
        async fn snapshot(&self) -> BackgroundSnapshot {
            self.inner.lock().clone()
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBackgroundStatus;

#[cfg(test)]
#[path = "background_status_tests.rs"]
mod tests;
