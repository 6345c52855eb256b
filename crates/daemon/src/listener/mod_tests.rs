// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::test_fixtures::Fixture;
use super::*;
use rec_wire::{encode_request, read_response};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;

async fn serve(ctx: Arc<ListenCtx>) -> (SocketAddr, CancellationToken) {
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = tcp.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    tokio::spawn(Listener::new(tcp, ctx).run(shutdown.clone()));
    (addr, shutdown)
}

async fn send_raw(addr: SocketAddr, bytes: &[u8], close_write: bool) -> (u16, Value) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(bytes).await.unwrap();
    if close_write {
        stream.shutdown().await.unwrap();
    }
    let (status, body) = read_response(&mut stream).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn call(
    addr: SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<&str>,
) -> (u16, Value) {
    let bytes = encode_request(method, path, token, body.map(str::as_bytes));
    send_raw(addr, &bytes, true).await
}

#[tokio::test]
async fn start_round_trip_over_tcp() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;
    let body = r#"{"target":"twitch.tv/foo","quality":"best"}"#;

    let first = call(addr, "POST", "/recording/start", None, Some(body)).await;
    assert_eq!(first, (200, json!({"ok": true, "started": true})));

    let second = call(addr, "POST", "/recording/start", None, Some(body)).await;
    assert_eq!(second.0, 409);
    assert_eq!(second.1["started"], false);
}

#[tokio::test]
async fn configured_token_is_required() {
    let f = Fixture::with_token("s3cret");
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;
    let unauthorized = json!({"ok": false, "error": "unauthorized"});

    assert_eq!(call(addr, "GET", "/health", None, None).await, (401, unauthorized.clone()));
    assert_eq!(call(addr, "GET", "/health", Some("wrong"), None).await, (401, unauthorized.clone()));
    assert_eq!(call(addr, "GET", "/health", Some("s3cret "), None).await.0, 200);
    assert_eq!(call(addr, "GET", "/health", Some("S3CRET"), None).await.0, 401);
    assert_eq!(call(addr, "GET", "/nope", None, None).await, (401, unauthorized));

    let (status, body) = call(addr, "GET", "/health", Some("s3cret"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() {
    let f = Fixture::with_token("s3cret");
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;
    let raw = b"GET /health HTTP/1.1\r\nAuthorization: Basic s3cret\r\nContent-Length: 0\r\n\r\n";

    assert_eq!(send_raw(addr, raw, true).await.0, 401);
}

#[tokio::test]
async fn no_token_means_open_access() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;

    assert_eq!(call(addr, "GET", "/health", Some("anything"), None).await.0, 200);
    assert_eq!(call(addr, "GET", "/health", None, None).await.0, 200);
}

#[tokio::test]
async fn query_string_is_ignored_for_routing() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;

    assert_eq!(call(addr, "GET", "/recording/status?poll=1", None, None).await.0, 200);
}

#[tokio::test]
async fn malformed_request_line_is_invalid() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;

    let (status, body) = send_raw(addr, b"garbage\r\n\r\n", true).await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({"ok": false, "error": "invalid_request"}));
}

#[tokio::test]
async fn truncated_body_is_invalid() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;
    let raw = b"POST /recording/start HTTP/1.1\r\nContent-Length: 100\r\n\r\n{\"target\":";

    let (status, _) = send_raw(addr, raw, true).await;
    assert_eq!(status, 400);
    assert!(f.engine.calls().is_empty());
}

#[tokio::test]
async fn stalled_request_times_out_as_invalid() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;

    // Write side stays open; the server gives up after its receive timeout
    let (status, _) = send_raw(addr, b"GET /health HTTP/1.1\r\n", false).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn handler_panic_becomes_internal_error() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(f.panicking_ctx()).await;

    let (status, body) = call(addr, "GET", "/recording/status", None, None).await;
    assert_eq!(status, 500);
    assert_eq!(body, json!({"ok": false, "error": "internal_error"}));

    // The listener keeps serving after a handler failure
    assert_eq!(call(addr, "GET", "/health", None, None).await.0, 200);
}

#[tokio::test]
async fn concurrent_starts_yield_one_winner() {
    let f = Fixture::new();
    let (addr, _shutdown) = serve(Arc::clone(&f.ctx)).await;
    let body = r#"{"target":"twitch.tv/foo"}"#;

    let handles: Vec<_> = (0..8)
        .map(|_| tokio::spawn(async move { call(addr, "POST", "/recording/start", None, Some(body)).await }))
        .collect();
    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap().0);
    }

    assert_eq!(statuses.iter().filter(|s| **s == 200).count(), 1);
    assert_eq!(statuses.iter().filter(|s| **s == 409).count(), 7);
}

#[tokio::test]
async fn listener_stops_on_shutdown() {
    let f = Fixture::new();
    let tcp = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let shutdown = CancellationToken::new();
    let task = tokio::spawn(Listener::new(tcp, Arc::clone(&f.ctx)).run(shutdown.clone()));

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), task).await.unwrap().unwrap();
}
