// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route handlers for the companion API.

use std::sync::Arc;

use chrono::Utc;
use rec_core::ChannelLogin;
use rec_engine::{merge_status, StartError, StartRequest, StopOutcome};
use rec_wire::{
    error_code, iso8601, ActiveRecording, ErrorBody, FailureItem, HealthResponse, HttpRequest,
    HttpResponse, RecordingItem, RecordingsResponse, RetentionRequest, RetentionResponse,
    StartRecordingRequest, StartResponse, StatusResponse, StopRecordingRequest, StopResponse,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{ListenCtx, SERVICE_NAME};

/// Route-level failures, each mapped to one status code.
#[derive(Debug, Error)]
pub(crate) enum HttpError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub(crate) fn status(&self) -> u16 {
        match self {
            HttpError::Unauthorized => 401,
            HttpError::InvalidRequest(_) => 400,
            HttpError::NotFound => 404,
            HttpError::Internal(_) => 500,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            HttpError::Unauthorized => error_code::UNAUTHORIZED,
            HttpError::InvalidRequest(_) => error_code::INVALID_REQUEST,
            HttpError::NotFound => error_code::NOT_FOUND,
            HttpError::Internal(_) => error_code::INTERNAL_ERROR,
        }
    }

    pub(crate) fn into_response(self) -> HttpResponse {
        HttpResponse::json(self.status(), &ErrorBody::new(self.code()))
    }
}

/// Routes the companion app polls; logged at debug.
pub(crate) fn is_polling(request: &HttpRequest) -> bool {
    request.method == "GET"
        && matches!(request.path.as_str(), "/health" | "/recording/status" | "/recordings")
}

pub(crate) async fn dispatch(ctx: &ListenCtx, request: HttpRequest) -> HttpResponse {
    let result = match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/health") => Ok(health()),
        ("GET", "/recording/status") => Ok(status(ctx).await),
        ("GET", "/recordings") => recordings(ctx).await,
        ("POST", "/recording/start") => start(ctx, &request.body).await,
        ("POST", "/recording/stop") => Ok(stop(ctx, &request.body)),
        ("POST", "/retention/enforce") => enforce(ctx, &request.body).await,
        _ => Err(HttpError::NotFound),
    };
    result.unwrap_or_else(HttpError::into_response)
}

fn health() -> HttpResponse {
    HttpResponse::json(
        200,
        &HealthResponse { ok: true, service: SERVICE_NAME.to_string(), timestamp: iso8601(Utc::now()) },
    )
}

async fn status(ctx: &ListenCtx) -> HttpResponse {
    let local = ctx.recorder.active_recordings();
    let background = ctx.background.snapshot().await;
    let merged = merge_status(&local, &background);

    HttpResponse::json(
        200,
        &StatusResponse {
            ok: true,
            active_recordings: merged.active_recordings,
            any_recording: merged.any_recording,
            badge_channel: merged.badge_channel,
            timestamp: iso8601(Utc::now()),
            background_recordings: merged.background_recordings,
            recordings: local.iter().map(ActiveRecording::from).collect(),
            recent_failures: ctx.recorder.recent_failures().iter().map(FailureItem::from).collect(),
        },
    )
}

async fn recordings(ctx: &ListenCtx) -> Result<HttpResponse, HttpError> {
    let retention = Arc::clone(&ctx.retention);
    let entries = tokio::task::spawn_blocking(move || retention.store().scan())
        .await
        .map_err(|e| HttpError::Internal(e.to_string()))?
        .map_err(|e| {
            warn!("failed to scan recordings: {}", e);
            HttpError::Internal(e.to_string())
        })?;

    Ok(HttpResponse::json(
        200,
        &RecordingsResponse { ok: true, recordings: entries.iter().map(RecordingItem::from).collect() },
    ))
}

async fn start(ctx: &ListenCtx, body: &[u8]) -> Result<HttpResponse, HttpError> {
    let body: StartRecordingRequest = parse_body(body)?;
    let mut request = StartRequest::new(body.target);
    request.channel_name = body.channel_name;
    request.quality = body.quality;

    match ctx.recorder.start(request).await {
        Ok(started) => {
            info!(
                channel = %started.channel_login,
                path = %started.output_path.display(),
                "recording started via companion API"
            );
            Ok(HttpResponse::json(200, &StartResponse::started()))
        }
        Err(e) => Ok(start_rejected(&e)),
    }
}

fn start_rejected(e: &StartError) -> HttpResponse {
    if e.is_invalid_request() {
        info!("start rejected as invalid: {}", e);
        return HttpError::InvalidRequest(e.to_string()).into_response();
    }
    info!("start rejected: {}", e);
    HttpResponse::json(409, &StartResponse::rejected(e.reason()))
}

fn stop(ctx: &ListenCtx, body: &[u8]) -> HttpResponse {
    let outcome = match parse_optional_body::<StopRecordingRequest>(body) {
        Ok(body) => {
            let requested =
                body.channel_login.as_deref().map(str::trim).filter(|login| !login.is_empty());
            match requested.map(ChannelLogin::parse) {
                None => ctx.recorder.stop(None),
                Some(Ok(login)) => ctx.recorder.stop(Some(&login)),
                Some(Err(e)) => {
                    debug!("ignoring stop for unusable channel login: {}", e);
                    StopOutcome::default()
                }
            }
        }
        Err(e) => {
            debug!("ignoring unparsable stop body: {}", e);
            StopOutcome::default()
        }
    };
    if !outcome.stopped.is_empty() {
        info!(count = outcome.stopped.len(), "recording stopped via companion API");
    }

    // Stopping nothing is still a success
    HttpResponse::json(200, &StopResponse { ok: true, stopped: true })
}

async fn enforce(ctx: &ListenCtx, body: &[u8]) -> Result<HttpResponse, HttpError> {
    let overrides: RetentionRequest = parse_optional_body(body)?;
    let policy = overrides.apply(ctx.retention_policy);

    let retention = Arc::clone(&ctx.retention);
    let report = tokio::task::spawn_blocking(move || retention.enforce_now(&policy))
        .await
        .map_err(|e| HttpError::Internal(e.to_string()))?
        .map_err(|e| {
            warn!("retention pass failed: {}", e);
            HttpError::Internal(e.to_string())
        })?;

    info!(
        deleted = report.deleted,
        failed = report.failed,
        skipped_active = report.skipped_active,
        "retention enforced via companion API"
    );
    Ok(HttpResponse::json(
        200,
        &RetentionResponse {
            ok: true,
            deleted: report.deleted,
            failed: report.failed,
            skipped_active: report.skipped_active,
        },
    ))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, HttpError> {
    serde_json::from_slice(body).map_err(|e| HttpError::InvalidRequest(e.to_string()))
}

/// Like [`parse_body`], but an empty body means all defaults.
fn parse_optional_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, HttpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    parse_body(body)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
