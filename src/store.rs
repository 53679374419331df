//! Persistence seam between the engine and the managed datastore.
//!
//! The surrounding application (report forms, inbox, dashboards) owns report
//! CRUD; the engine only ever reads pending reports, checks pair existence,
//! and appends match results. [`MatchStore`] captures exactly that surface so
//! the engine can be exercised against a test double, and [`StoreConfig`]
//! selects between backends at runtime.

mod memory;
mod redb;

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::reports::{FoundReport, LostReport, MatchRecord, Notification};

pub use memory::InMemoryStore;
pub use redb::RedbStore;

/// Errors produced by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying backend failed (I/O, transaction, table access).
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A stored row could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Storage backend for reports, matches, and notifications.
///
/// The engine treats this as append-only: it never mutates existing rows. The
/// report insert methods exist for the hosting application and for tests.
pub trait MatchStore: Send + Sync {
    /// All lost reports currently in `pending` status.
    fn pending_lost(&self) -> Result<Vec<LostReport>, StoreError>;
    /// All found reports currently in `pending` status.
    fn pending_found(&self) -> Result<Vec<FoundReport>, StoreError>;

    /// Whether a match for this (lost, found) pair was recorded by any prior
    /// run. Checked per candidate pair during the scan; the engine never
    /// relies on an insert-time constraint violation for deduplication.
    fn match_exists(&self, lost_id: Uuid, found_id: Uuid) -> Result<bool, StoreError>;

    /// Append a batch of match records.
    fn insert_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError>;
    /// Append a batch of notifications.
    fn insert_notifications(&self, records: &[Notification]) -> Result<(), StoreError>;

    /// Persist one run's output.
    ///
    /// The default mirrors the source system: two separate bulk inserts,
    /// matches first, with no cross-call atomicity — a crash in between
    /// leaves matches without their notifications. Backends that support
    /// transactions should override this with a single atomic commit, as
    /// [`RedbStore`] does.
    fn persist_run(
        &self,
        matches: &[MatchRecord],
        notifications: &[Notification],
    ) -> Result<(), StoreError> {
        self.insert_matches(matches)?;
        self.insert_notifications(notifications)
    }

    /// Insert a lost report (hosting application / test setup).
    fn insert_lost(&self, report: &LostReport) -> Result<(), StoreError>;
    /// Insert a found report (hosting application / test setup).
    fn insert_found(&self, report: &FoundReport) -> Result<(), StoreError>;
}

/// Configuration for selecting and building a store backend.
#[derive(Clone, Debug, Default)]
pub enum StoreConfig {
    /// An in-memory store, useful for tests and ephemeral deployments.
    #[default]
    InMemory,
    /// A redb file at `path`. Redb is a pure Rust embedded database with
    /// ACID transactions, which lets [`RedbStore`] commit a run's matches
    /// and notifications atomically.
    Redb { path: String },
}

impl StoreConfig {
    /// Create an in-memory store configuration.
    pub fn in_memory() -> Self {
        StoreConfig::InMemory
    }

    /// Create a redb store configuration backed by a database file.
    pub fn redb<P: Into<String>>(path: P) -> Self {
        StoreConfig::Redb { path: path.into() }
    }

    /// Build the configured backend.
    pub fn build(&self) -> Result<Arc<dyn MatchStore>, StoreError> {
        match self {
            StoreConfig::InMemory => Ok(Arc::new(InMemoryStore::new())),
            StoreConfig::Redb { path } => Ok(Arc::new(RedbStore::open(path)?)),
        }
    }
}

/// Storage key for a match row: the (lost, found) pair is the natural key,
/// so re-inserting the same pair can only overwrite the same row.
pub(crate) fn match_key(lost_id: Uuid, found_id: Uuid) -> String {
    format!("{lost_id}/{found_id}")
}
