// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded capture of a child's output stream.

use tokio::io::{AsyncRead, AsyncReadExt};

/// Bytes of output kept for diagnostics
pub(crate) const TAIL_BYTES: usize = 4096;

/// Drain `reader` to EOF, keeping only the last `limit` bytes.
pub(crate) async fn collect_tail<R: AsyncRead + Unpin>(mut reader: R, limit: usize) -> String {
    let mut tail: Vec<u8> = Vec::with_capacity(limit.min(1024));
    let mut chunk = [0u8; 2048];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                tail.extend_from_slice(&chunk[..n]);
                if tail.len() > limit {
                    let excess = tail.len() - limit;
                    tail.drain(..excess);
                }
            }
        }
    }
    String::from_utf8_lossy(&tail).into_owned()
}
