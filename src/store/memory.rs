//! In-memory store backend, used by tests and ephemeral deployments.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::reports::{FoundReport, LostReport, MatchRecord, Notification, ReportStatus};
use crate::store::{match_key, MatchStore, StoreError};

/// HashMap-backed [`MatchStore`].
///
/// Interior mutability through `RwLock` so it can sit behind the same
/// `Arc<dyn MatchStore>` handle as the persistent backend.
#[derive(Default)]
pub struct InMemoryStore {
    lost: RwLock<Vec<LostReport>>,
    found: RwLock<Vec<FoundReport>>,
    matches: RwLock<HashMap<String, MatchRecord>>,
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded matches, for assertions in tests.
    pub fn matches(&self) -> Vec<MatchRecord> {
        self.matches
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// Snapshot of all recorded notifications, for assertions in tests.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MatchStore for InMemoryStore {
    fn pending_lost(&self) -> Result<Vec<LostReport>, StoreError> {
        let lost = self
            .lost
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(lost
            .iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .cloned()
            .collect())
    }

    fn pending_found(&self) -> Result<Vec<FoundReport>, StoreError> {
        let found = self
            .found
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(found
            .iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .cloned()
            .collect())
    }

    fn match_exists(&self, lost_id: Uuid, found_id: Uuid) -> Result<bool, StoreError> {
        let matches = self
            .matches
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(matches.contains_key(&match_key(lost_id, found_id)))
    }

    fn insert_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        let mut matches = self
            .matches
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for record in records {
            matches.insert(
                match_key(record.lost_item_id, record.found_item_id),
                record.clone(),
            );
        }
        Ok(())
    }

    fn insert_notifications(&self, records: &[Notification]) -> Result<(), StoreError> {
        let mut notifications = self
            .notifications
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        notifications.extend_from_slice(records);
        Ok(())
    }

    fn insert_lost(&self, report: &LostReport) -> Result<(), StoreError> {
        let mut lost = self
            .lost
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        lost.push(report.clone());
        Ok(())
    }

    fn insert_found(&self, report: &FoundReport) -> Result<(), StoreError> {
        let mut found = self
            .found
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        found.push(report.clone());
        Ok(())
    }
}
