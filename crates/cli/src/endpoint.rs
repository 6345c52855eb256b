// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Where the companion API lives and how to authenticate.
//!
//! Flags win; anything unset comes from the daemon's settings, which
//! already fold in `REC_PORT` and `REC_AUTH_TOKEN`.

use rec_daemon::Settings;

use crate::client::DaemonClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub token: Option<String>,
}

impl Endpoint {
    /// Settings are loaded only when a flag leaves something unset.
    pub fn resolve(
        host: &str,
        port: Option<u16>,
        token: Option<String>,
        load_settings: impl FnOnce() -> anyhow::Result<Settings>,
    ) -> anyhow::Result<Self> {
        let (port, token) = match (port, token) {
            (Some(port), Some(token)) => (port, Some(token)),
            (port, token) => {
                let settings = load_settings()?;
                (
                    port.unwrap_or_else(|| settings.port()),
                    token.or_else(|| settings.auth_token().map(str::to_string)),
                )
            }
        };
        Ok(Self { host: host.to_string(), port, token: token.filter(|t| !t.is_empty()) })
    }

    pub fn client(&self) -> DaemonClient {
        DaemonClient::new(&self.host, self.port, self.token.clone())
            .with_timeout(rec_daemon::env::io_timeout())
    }
}

#[cfg(test)]
#[path = "endpoint_tests.rs"]
mod tests;
