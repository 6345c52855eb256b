// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minimal HTTP/1.1 framing.
//!
//! Requests are buffered until the `\r\n\r\n` head terminator, then
//! `Content-Length` decides how many body bytes to wait for. Responses are
//! always closed after one exchange, so neither side needs chunked encoding.

use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest accepted request head (request line + headers)
pub const MAX_HEADER_BYTES: usize = 16 * 1024;
/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error)]
pub enum FramingError {
    #[error("connection closed before a complete message was received")]
    Incomplete,
    #[error("malformed message: {0}")]
    Malformed(String),
    #[error("message exceeds size limit")]
    TooLarge,
    #[error("timed out waiting for message")]
    Timeout,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully received request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    /// Request path with the query string removed
    pub path: String,
    pub query: Option<String>,
    /// Header names are lowercased
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// First header with the given (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers.iter().find(|(key, _)| *key == name).map(|(_, value)| value.as_str())
    }

    /// Token of an `Authorization: Bearer <token>` header
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.header("authorization")?;
        let (scheme, token) = value.split_once(' ')?;
        if scheme.eq_ignore_ascii_case("bearer") {
            Some(token.trim())
        } else {
            None
        }
    }
}

struct Head {
    method: String,
    path: String,
    query: Option<String>,
    headers: Vec<(String, String)>,
    content_length: usize,
}

/// Read one request, failing on timeout, early EOF, or oversize input.
pub async fn read_request<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<HttpRequest, FramingError> {
    tokio::time::timeout(timeout, read_request_inner(reader))
        .await
        .map_err(|_| FramingError::Timeout)?
}

async fn read_request_inner<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<HttpRequest, FramingError> {
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];
    let mut head: Option<(Head, usize)> = None;

    loop {
        if head.is_none() {
            if let Some(end) = find_subslice(&buf, HEAD_TERMINATOR) {
                let parsed = parse_request_head(&buf[..end])?;
                if parsed.content_length > MAX_BODY_BYTES {
                    return Err(FramingError::TooLarge);
                }
                head = Some((parsed, end + HEAD_TERMINATOR.len()));
            } else if buf.len() > MAX_HEADER_BYTES {
                return Err(FramingError::TooLarge);
            }
        }

        if let Some((parsed, body_start)) = head.take() {
            let body_end = body_start + parsed.content_length;
            if buf.len() >= body_end {
                return Ok(HttpRequest {
                    method: parsed.method,
                    path: parsed.path,
                    query: parsed.query,
                    headers: parsed.headers,
                    body: buf[body_start..body_end].to_vec(),
                });
            }
            head = Some((parsed, body_start));
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(FramingError::Incomplete);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn parse_request_head(raw: &[u8]) -> Result<Head, FramingError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| FramingError::Malformed("request head is not UTF-8".into()))?;
    let mut lines = text.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let (Some(method), Some(target), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(FramingError::Malformed(format!("bad request line: {request_line:?}")));
    };
    if !version.starts_with("HTTP/1.") {
        return Err(FramingError::Malformed(format!("unsupported version: {version}")));
    }

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (path.to_string(), Some(query.to_string())),
        None => (target.to_string(), None),
    };

    let headers = parse_headers(lines)?;
    let content_length = content_length(&headers)?;

    Ok(Head { method: method.to_ascii_uppercase(), path, query, headers, content_length })
}

fn parse_headers<'a>(
    lines: impl Iterator<Item = &'a str>,
) -> Result<Vec<(String, String)>, FramingError> {
    let mut headers = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| FramingError::Malformed(format!("bad header line: {line:?}")))?;
        headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
    }
    Ok(headers)
}

fn content_length(headers: &[(String, String)]) -> Result<usize, FramingError> {
    match headers.iter().find(|(name, _)| name == "content-length") {
        Some((_, value)) => value
            .parse()
            .map_err(|_| FramingError::Malformed(format!("bad content-length: {value:?}"))),
        None => Ok(0),
    }
}

/// A JSON response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Serialize `body` as JSON; serialization failure degrades to a 500.
    pub fn json<T: serde::Serialize>(status: u16, body: &T) -> Self {
        match serde_json::to_vec(body) {
            Ok(body) => Self { status, body },
            Err(_) => Self {
                status: 500,
                body: br#"{"ok":false,"error":"internal_error"}"#.to_vec(),
            },
        }
    }

    pub fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            401 => "Unauthorized",
            404 => "Not Found",
            409 => "Conflict",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
    }

    /// Full response bytes including head.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            self.reason(),
            self.body.len()
        )
        .into_bytes();
        out.extend_from_slice(&self.body);
        out
    }
}

/// Write a response and flush.
pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &HttpResponse,
) -> Result<(), FramingError> {
    writer.write_all(&response.to_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

/// Encode a client request with an optional bearer token and JSON body.
pub fn encode_request(method: &str, path: &str, token: Option<&str>, body: Option<&[u8]>) -> Vec<u8> {
    let mut head = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        head.push_str(&format!("Authorization: Bearer {token}\r\n"));
    }
    let body = body.unwrap_or_default();
    if !body.is_empty() {
        head.push_str("Content-Type: application/json\r\n");
    }
    head.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    let mut out = head.into_bytes();
    out.extend_from_slice(body);
    out
}

/// Read a response: `(status, body)`. Uses Content-Length when present,
/// otherwise reads to EOF.
pub async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<(u16, Vec<u8>), FramingError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    let end = find_subslice(&buf, HEAD_TERMINATOR).ok_or(FramingError::Incomplete)?;
    let text = std::str::from_utf8(&buf[..end])
        .map_err(|_| FramingError::Malformed("response head is not UTF-8".into()))?;
    let mut lines = text.split("\r\n");
    let status_line = lines.next().unwrap_or_default();
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| FramingError::Malformed(format!("bad status line: {status_line:?}")))?;
    let headers = parse_headers(lines)?;
    let body_start = end + HEAD_TERMINATOR.len();
    let body = match headers.iter().find(|(name, _)| name == "content-length") {
        Some(_) => {
            let len = content_length(&headers)?;
            if buf.len() < body_start + len {
                return Err(FramingError::Incomplete);
            }
            buf[body_start..body_start + len].to_vec()
        }
        None => buf[body_start..].to_vec(),
    };
    Ok((status, body))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
