// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing setup for `recd`.

use std::io::IsTerminal;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// Keeps the non-blocking log writer alive; flushes on drop.
#[derive(Debug)]
pub struct TelemetryGuard {
    _guard: Option<WorkerGuard>,
}

/// Install the global subscriber. Logs go to `log_path` unless `foreground`
/// is set or the file cannot be opened, in which case they go to stderr.
pub fn init(log_path: &Path, foreground: bool) -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, guard, ansi) = if foreground {
        (BoxMakeWriter::new(std::io::stderr), None, std::io::stderr().is_terminal())
    } else {
        let opened = log_path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .and_then(|()| std::fs::OpenOptions::new().create(true).append(true).open(log_path));
        match opened {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                (BoxMakeWriter::new(non_blocking), Some(guard), false)
            }
            Err(err) => {
                eprintln!("Warning: failed to open log file {}: {}", log_path.display(), err);
                (BoxMakeWriter::new(std::io::stderr), None, std::io::stderr().is_terminal())
            }
        }
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    if subscriber.try_init().is_err() {
        return TelemetryGuard { _guard: None };
    }
    TelemetryGuard { _guard: guard }
}
