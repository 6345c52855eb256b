// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Companion HTTP listener.
//!
//! The Listener runs in a spawned task, accepting connections and handling
//! each one in its own task. Every connection carries exactly one request
//! and ends with a JSON response, including framing and handler failures.

mod routes;

use routes::HttpError;

use std::sync::Arc;
use std::time::Duration;

use rec_adapters::BackgroundStatusSource;
use rec_core::{RetentionPolicy, SystemClock};
use rec_engine::{Recorder, RetentionEnforcer};
use rec_wire::{read_request, write_response, FramingError, HttpRequest, HttpResponse};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// `service` reported by `GET /health`
pub const SERVICE_NAME: &str = "rec-companion";

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub recorder: Arc<dyn Recorder>,
    pub retention: Arc<RetentionEnforcer<SystemClock>>,
    /// Policy for `POST /retention/enforce` when the body sets nothing
    pub retention_policy: RetentionPolicy,
    pub background: Arc<dyn BackgroundStatusSource>,
    /// When set, requests must carry `Authorization: Bearer <token>`
    pub auth_token: Option<String>,
    /// Receive timeout for one request
    pub io_timeout: Duration,
}

/// Listener task for accepting companion connections.
pub struct Listener {
    tcp: TcpListener,
    ctx: Arc<ListenCtx>,
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { tcp, ctx }
    }

    /// Run the accept loop until `shutdown` fires.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.tcp.accept() => match result {
                    Ok((stream, addr)) => {
                        debug!("connection from {}", addr);
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(stream, ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("accept error: {}", e),
                },
            }
        }
        debug!("listener stopped");
    }
}

fn log_connection_error(e: FramingError) {
    match e {
        FramingError::Io(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
            debug!("Client disconnected")
        }
        _ => warn!("Connection error: {}", e),
    }
}

/// Handle a single client connection: read, respond, close.
async fn handle_connection(stream: TcpStream, ctx: Arc<ListenCtx>) -> Result<(), FramingError> {
    let (mut reader, mut writer) = stream.into_split();

    let response = match read_request(&mut reader, ctx.io_timeout).await {
        Ok(request) => respond(request, &ctx).await,
        Err(e) => {
            debug!("rejecting request: {}", e);
            HttpError::InvalidRequest(e.to_string()).into_response()
        }
    };

    write_response(&mut writer, &response).await?;
    writer.shutdown().await?;
    Ok(())
}

/// Authorize, then route in a child task so a panicking handler still
/// produces a response.
async fn respond(request: HttpRequest, ctx: &Arc<ListenCtx>) -> HttpResponse {
    if let Err(e) = authorize(&request, ctx.auth_token.as_deref()) {
        info!(method = %request.method, path = %request.path, "rejected unauthorized request");
        return e.into_response();
    }

    // Polling routes log at debug, everything else at info
    if routes::is_polling(&request) {
        debug!(method = %request.method, path = %request.path, "received request");
    } else {
        info!(method = %request.method, path = %request.path, "received request");
    }

    let ctx = Arc::clone(ctx);
    match tokio::spawn(async move { routes::dispatch(&ctx, request).await }).await {
        Ok(response) => response,
        Err(e) => {
            error!("request handler failed: {}", e);
            HttpError::Internal(e.to_string()).into_response()
        }
    }
}

/// Exact bearer-token match when a token is configured.
fn authorize(request: &HttpRequest, expected: Option<&str>) -> Result<(), HttpError> {
    match expected {
        None => Ok(()),
        Some(expected) if request.bearer_token() == Some(expected) => Ok(()),
        Some(_) => Err(HttpError::Unauthorized),
    }
}

#[cfg(test)]
mod test_fixtures;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
