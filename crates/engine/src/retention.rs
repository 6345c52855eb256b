// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retention enforcement over the recordings directory.
//!
//! Planning is pure: age, keep-last-per-channel, then keep-last-global, with
//! the union of marks deleted. Files held by an active recording are ranked
//! like any other file but are never deleted.

use crate::store::{sort_newest_first, RecordingStore};
use chrono::{Duration, NaiveDateTime};
use rec_core::{Clock, RecordingEntry, RetentionPolicy, RetentionReport};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetentionError {
    #[error("cannot scan {}: {source}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Source of paths that must not be deleted.
pub trait ActiveOutputs: Send + Sync {
    fn active_output_paths(&self) -> HashSet<PathBuf>;
}

impl<C: Clock> ActiveOutputs for crate::registry::Registry<C> {
    fn active_output_paths(&self) -> HashSet<PathBuf> {
        crate::registry::Registry::active_output_paths(self)
    }
}

/// Files selected for deletion by one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionPlan {
    pub delete: Vec<PathBuf>,
    /// Matched by a rule but held by an active recording
    pub skipped_active: Vec<PathBuf>,
}

/// Decide which of `entries` to delete at `now` (local time, like filenames).
pub fn plan_deletions(
    policy: &RetentionPolicy,
    entries: &[RecordingEntry],
    now: NaiveDateTime,
    protected: &HashSet<PathBuf>,
) -> RetentionPlan {
    let mut marked: BTreeSet<usize> = BTreeSet::new();

    if policy.max_age_days > 0 {
        let cutoff = now - Duration::days(i64::from(policy.max_age_days));
        marked.extend(
            entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.recorded_at.is_some_and(|at| at < cutoff))
                .map(|(i, _)| i),
        );
    }

    let mut per_channel_marks = BTreeSet::new();
    if policy.keep_last_per_channel > 0 {
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (i, entry) in entries.iter().enumerate() {
            groups.entry(entry.channel_name.as_str()).or_default().push(i);
        }
        for group in groups.values() {
            let ranked = rank(entries, group.iter().copied());
            per_channel_marks.extend(ranked.into_iter().skip(policy.keep_last_per_channel as usize));
        }
        marked.extend(per_channel_marks.iter().copied());
    }

    if policy.keep_last_global > 0 {
        let survivors = (0..entries.len()).filter(|i| !per_channel_marks.contains(i));
        marked.extend(rank(entries, survivors).into_iter().skip(policy.keep_last_global as usize));
    }

    let mut plan = RetentionPlan::default();
    for i in marked {
        let path = entries[i].file_path.clone();
        if protected.contains(&path) {
            plan.skipped_active.push(path);
        } else {
            plan.delete.push(path);
        }
    }
    plan
}

/// Indices ordered newest first, undated last.
fn rank(entries: &[RecordingEntry], indices: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut ranked: Vec<usize> = indices.collect();
    ranked.sort_by(|&a, &b| {
        let (a, b) = (&entries[a], &entries[b]);
        b.recorded_at.cmp(&a.recorded_at).then_with(|| a.file_path.cmp(&b.file_path))
    });
    ranked
}

/// Scans, plans, and deletes.
pub struct RetentionEnforcer<C: Clock> {
    store: RecordingStore,
    active: Arc<dyn ActiveOutputs>,
    clock: C,
}

impl<C: Clock> RetentionEnforcer<C> {
    pub fn new(store: RecordingStore, active: Arc<dyn ActiveOutputs>, clock: C) -> Self {
        Self { store, active, clock }
    }

    pub fn store(&self) -> &RecordingStore {
        &self.store
    }

    /// Run one pass. Each deletion is attempted independently; failures are
    /// counted, not fatal. Blocking: call from a blocking-capable context.
    pub fn enforce_now(&self, policy: &RetentionPolicy) -> Result<RetentionReport, RetentionError> {
        if policy.is_disabled() {
            return Ok(RetentionReport::default());
        }
        let mut entries = self
            .store
            .scan()
            .map_err(|source| RetentionError::Scan { dir: self.store.dir().to_path_buf(), source })?;
        sort_newest_first(&mut entries);

        let protected = self.protected_paths();
        let plan = plan_deletions(policy, &entries, self.clock.local_now(), &protected);

        let mut report =
            RetentionReport { skipped_active: plan.skipped_active.len(), ..Default::default() };
        for path in &plan.skipped_active {
            tracing::debug!(path = %path.display(), "retention skipped active recording");
        }
        for path in plan.delete {
            match self.store.delete(&path) {
                Ok(()) => {
                    tracing::info!(path = %path.display(), "retention deleted recording");
                    report.deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "retention delete failed");
                    report.failed += 1;
                }
            }
        }
        tracing::info!(
            deleted = report.deleted,
            failed = report.failed,
            skipped_active = report.skipped_active,
            "retention pass complete"
        );
        Ok(report)
    }

    /// Active outputs as recorded, plus their canonical forms.
    fn protected_paths(&self) -> HashSet<PathBuf> {
        let mut protected = self.active.active_output_paths();
        let canonical: Vec<PathBuf> =
            protected.iter().filter_map(|p| std::fs::canonicalize(p).ok()).collect();
        protected.extend(canonical);
        if let Ok(dir) = std::fs::canonicalize(self.store.dir()) {
            // Scan paths are built from the configured dir; map canonical back
            let mapped: Vec<PathBuf> = protected
                .iter()
                .filter_map(|p| p.strip_prefix(&dir).ok())
                .map(|rest| self.store.dir().join(rest))
                .collect();
            protected.extend(mapped);
        }
        protected
    }
}

#[cfg(test)]
#[path = "retention_tests.rs"]
mod tests;
