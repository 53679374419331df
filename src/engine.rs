//! Batch matching engine.
//!
//! One run reads the pending lost and found reports, scores the full cross
//! product, and appends a [`MatchRecord`] plus two [`Notification`]s for every
//! pair at or above the threshold that no prior run has recorded. The engine
//! never mutates report status and never deletes or rescores a match; those
//! remain actions of the surrounding application.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::metrics::metrics_recorder;
use crate::reports::{
    FoundReport, LostReport, MatchRecord, MatchStatus, Notification, NotificationKind,
};
use crate::scorer::score;
use crate::store::{MatchStore, StoreError};


/// Minimum score for a pair to be recorded as a match.
pub const MATCH_THRESHOLD: u32 = 50;

/// Notification title used for both sides of a match.
const MATCH_TITLE: &str = "Potential Match Found!";

/// Errors produced by a matching run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Reading pending reports or the match store failed. The run aborts
    /// before any write is attempted.
    #[error("failed to read pending reports: {0}")]
    Source(#[source] StoreError),
    /// Persisting the run's output failed after scoring completed. The run
    /// is not retried internally; re-invocation is safe because recorded
    /// pairs are skipped by the deduplication check.
    #[error("failed to persist match results: {0}")]
    Persist(#[source] StoreError),
}

/// Summary returned by a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of new match records created by this run.
    pub matches_found: usize,
}

/// Engine for one-shot matching passes over the pending report sets.
pub struct MatchEngine {
    store: Arc<dyn MatchStore>,
    // Serializes runs. Two overlapping runs could otherwise both pass the
    // existence check for the same pair before either commits.
    run_lock: Mutex<()>,
}

impl MatchEngine {
    /// Construct an engine over the given store.
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self {
            store,
            run_lock: Mutex::new(()),
        }
    }

    /// Execute one matching pass and return the number of matches created.
    ///
    /// The scan is a single-threaded O(L×F) pass with no pruning; every
    /// pending pair is scored. Writes happen only after the full scan, and
    /// only when at least one new match was produced.
    pub fn run(&self) -> Result<RunSummary, EngineError> {
        let _guard = self
            .run_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let start = Instant::now();

        let lost_reports = self.store.pending_lost().map_err(EngineError::Source)?;
        let found_reports = self.store.pending_found().map_err(EngineError::Source)?;

        let mut matches: Vec<MatchRecord> = Vec::new();
        let mut notifications: Vec<Notification> = Vec::new();

        for lost in &lost_reports {
            for found in &found_reports {
                let verdict = score(lost, found);
                if verdict.points < MATCH_THRESHOLD {
                    continue;
                }
                if self
                    .store
                    .match_exists(lost.id, found.id)
                    .map_err(EngineError::Source)?
                {
                    continue;
                }

                matches.push(MatchRecord {
                    id: Uuid::new_v4(),
                    lost_item_id: lost.id,
                    found_item_id: found.id,
                    score: verdict.points,
                    reason: verdict.reason,
                    status: MatchStatus::Pending,
                    created_at: Utc::now(),
                });
                notifications.push(notify_lost_side(lost, verdict.points));
                notifications.push(notify_found_side(found, verdict.points));
            }
        }

        if !matches.is_empty() {
            self.store
                .persist_run(&matches, &notifications)
                .map_err(EngineError::Persist)?;
        }

        let matches_found = matches.len();
        tracing::info!(
            lost = lost_reports.len(),
            found = found_reports.len(),
            matches_found,
            "matching run complete"
        );
        if let Some(recorder) = metrics_recorder() {
            recorder.record_run(
                start.elapsed(),
                lost_reports.len() * found_reports.len(),
                matches_found,
            );
        }

        Ok(RunSummary { matches_found })
    }
}

fn notify_lost_side(lost: &LostReport, points: u32) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        user_id: lost.user_id,
        title: MATCH_TITLE.to_string(),
        message: format!(
            "We found a potential match for your lost item: {}. Match score: {points}%",
            lost.item_name
        ),
        kind: NotificationKind::MatchFound,
        read: false,
        related_item_id: Some(lost.id),
        created_at: Utc::now(),
    }
}

fn notify_found_side(found: &FoundReport, points: u32) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        user_id: found.user_id,
        title: MATCH_TITLE.to_string(),
        message: format!(
            "Your found item ({}) may match a lost item. Match score: {points}%",
            found.item_name
        ),
        kind: NotificationKind::MatchFound,
        read: false,
        related_item_id: Some(found.id),
        created_at: Utc::now(),
    }
}
