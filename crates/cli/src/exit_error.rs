// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error type that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination.

use std::fmt;

use crate::client::ClientError;

/// Exit codes for `rec`
pub mod codes {
    pub const FAILURE: i32 = 1;
    /// The daemon refused the request (409, 400, 404)
    pub const REJECTED: i32 = 2;
    /// Nothing listening at the companion address
    pub const NOT_RUNNING: i32 = 3;
    pub const UNAUTHORIZED: i32 = 4;
}

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl From<ClientError> for ExitError {
    fn from(err: ClientError) -> Self {
        match &err {
            ClientError::NotRunning { addr, .. } => Self::new(
                codes::NOT_RUNNING,
                format!("recording daemon is not running at {addr} (start it with `recd`)"),
            ),
            ClientError::Api { status: 401, .. } => {
                Self::new(codes::UNAUTHORIZED, "unauthorized: check --token or REC_AUTH_TOKEN")
            }
            ClientError::Api { status, error } if *status < 500 => {
                Self::new(codes::REJECTED, error.clone())
            }
            _ => Self::new(codes::FAILURE, err.to_string()),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
