// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Companion API client.
//!
//! One request per connection: write the request, half-close, read the
//! response to EOF.

use std::time::Duration;

use rec_wire::{
    encode_request, read_response, ErrorBody, FramingError, HealthResponse, RecordingItem,
    RecordingsResponse, RetentionRequest, RetentionResponse, StartRecordingRequest, StartResponse,
    StatusResponse, StopRecordingRequest, StopResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Overall deadline for one request, connect included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("recording daemon is not reachable at {addr}: {source}")]
    NotRunning {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("daemon returned {status}: {error}")]
    Api { status: u16, error: String },

    #[error("bad response: {0}")]
    Framing(#[from] FramingError),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct DaemonClient {
    addr: String,
    token: Option<String>,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(host: &str, port: u16, token: Option<String>) -> Self {
        Self {
            addr: format!("{host}:{port}"),
            token: token.filter(|t| !t.is_empty()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        self.send("GET", "/health", None::<&()>).await
    }

    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.send("GET", "/recording/status", None::<&()>).await
    }

    pub async fn recordings(&self) -> Result<Vec<RecordingItem>, ClientError> {
        let response: RecordingsResponse = self.send("GET", "/recordings", None::<&()>).await?;
        Ok(response.recordings)
    }

    /// Start a recording. A rejection (e.g. already recording) comes back as
    /// `ClientError::Api` carrying the reason.
    pub async fn start(&self, request: &StartRecordingRequest) -> Result<StartResponse, ClientError> {
        self.send("POST", "/recording/start", Some(request)).await
    }

    /// Stop one channel, or every active recording when `channel` is `None`.
    pub async fn stop(&self, channel: Option<&str>) -> Result<StopResponse, ClientError> {
        let request = StopRecordingRequest { channel_login: channel.map(str::to_string) };
        self.send("POST", "/recording/stop", Some(&request)).await
    }

    pub async fn enforce_retention(
        &self,
        request: &RetentionRequest,
    ) -> Result<RetentionResponse, ClientError> {
        self.send("POST", "/retention/enforce", Some(request)).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ClientError> {
        let body = body.map(serde_json::to_vec).transpose()?;
        let bytes = encode_request(method, path, self.token.as_deref(), body.as_deref());

        let (status, body) = tokio::time::timeout(self.timeout, self.round_trip(&bytes))
            .await
            .map_err(|_| ClientError::Timeout(self.timeout))??;
        decode(status, &body)
    }

    async fn round_trip(&self, request: &[u8]) -> Result<(u16, Vec<u8>), ClientError> {
        let mut stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| ClientError::NotRunning { addr: self.addr.clone(), source })?;
        stream.write_all(request).await?;
        stream.shutdown().await?;
        Ok(read_response(&mut stream).await?)
    }
}

/// Map a response to `T` on 2xx, else to the error body's code.
fn decode<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, ClientError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_slice(body)?);
    }
    let error = serde_json::from_slice::<ErrorBody>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| String::from_utf8_lossy(body).into_owned());
    Err(ClientError::Api { status, error })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
