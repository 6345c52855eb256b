// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Companion API wire format.
//!
//! HTTP/1.1 with one request per connection, JSON bodies, `Connection: close`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod http;
mod request;
mod response;

pub use http::{
    encode_request, read_request, read_response, write_response, FramingError, HttpRequest,
    HttpResponse, MAX_BODY_BYTES, MAX_HEADER_BYTES,
};
pub use request::{RetentionRequest, StartRecordingRequest, StopRecordingRequest};
pub use response::{
    error_code, iso8601, iso8601_local, ActiveRecording, ErrorBody, FailureItem, HealthResponse,
    RecordingItem, RecordingsResponse, RetentionResponse, StartResponse, StatusResponse,
    StopResponse,
};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
