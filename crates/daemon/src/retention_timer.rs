// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic retention passes.

use std::sync::Arc;
use std::time::Duration;

use rec_core::{Clock, RetentionPolicy};
use rec_engine::RetentionEnforcer;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Run `policy` every `interval` (first pass immediately) until `shutdown`.
pub fn spawn_periodic<C: Clock>(
    retention: Arc<RetentionEnforcer<C>>,
    policy: RetentionPolicy,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    info!(?interval, "retention timer started");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => run_pass(&retention, policy).await,
            }
        }
        debug!("retention timer stopped");
    })
}

async fn run_pass<C: Clock>(retention: &Arc<RetentionEnforcer<C>>, policy: RetentionPolicy) {
    let retention = Arc::clone(retention);
    match tokio::task::spawn_blocking(move || retention.enforce_now(&policy)).await {
        Ok(Ok(report)) if report.deleted > 0 || report.failed > 0 => info!(
            deleted = report.deleted,
            failed = report.failed,
            skipped_active = report.skipped_active,
            "retention pass complete"
        ),
        Ok(Ok(_)) => debug!("retention pass found nothing to delete"),
        Ok(Err(e)) => warn!("retention pass failed: {}", e),
        Err(e) => warn!("retention pass aborted: {}", e),
    }
}

#[cfg(test)]
#[path = "retention_timer_tests.rs"]
mod tests;
