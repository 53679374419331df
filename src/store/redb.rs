//! Redb store backend.
//!
//! Redb is a pure Rust embedded key-value store with ACID transactions, which
//! is what lets this backend commit a whole run (matches plus notifications)
//! as one atomic write — the guarantee the in-memory default cannot give.
//! Match rows are keyed on the (lost, found) pair, so even a racing duplicate
//! insert lands on the same row instead of creating a second record.

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::reports::{FoundReport, LostReport, MatchRecord, Notification, ReportStatus};
use crate::store::{match_key, MatchStore, StoreError};

const LOST_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("lost_reports");
const FOUND_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("found_reports");
const MATCH_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("matches");
const NOTIFICATION_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("notifications");

/// Persistent [`MatchStore`] over a redb database file.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path, ensuring all four
    /// tables exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path).map_err(|e| StoreError::backend(e.to_string()))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            // Opening a table creates it if it does not exist yet.
            write_txn
                .open_table(LOST_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            write_txn
                .open_table(FOUND_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            write_txn
                .open_table(MATCH_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            write_txn
                .open_table(NOTIFICATION_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    fn scan_table<T>(&self, table: TableDefinition<&str, &[u8]>) -> Result<Vec<T>, StoreError>
    where
        T: serde::de::DeserializeOwned,
    {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(table)
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut rows = Vec::new();
        for entry in table.iter().map_err(|e| StoreError::backend(e.to_string()))? {
            let (_, value) = entry.map_err(|e| StoreError::backend(e.to_string()))?;
            rows.push(serde_json::from_slice(value.value())?);
        }
        Ok(rows)
    }

    fn put<T: serde::Serialize>(
        &self,
        table: TableDefinition<&str, &[u8]>,
        key: &str,
        row: &T,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(row)?;
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let mut table = write_txn
                .open_table(table)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            table
                .insert(key, bytes.as_slice())
                .map_err(|e| StoreError::backend(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))
    }
}

impl MatchStore for RedbStore {
    fn pending_lost(&self) -> Result<Vec<LostReport>, StoreError> {
        let rows: Vec<LostReport> = self.scan_table(LOST_TABLE)?;
        Ok(rows
            .into_iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .collect())
    }

    fn pending_found(&self) -> Result<Vec<FoundReport>, StoreError> {
        let rows: Vec<FoundReport> = self.scan_table(FOUND_TABLE)?;
        Ok(rows
            .into_iter()
            .filter(|r| r.status == ReportStatus::Pending)
            .collect())
    }

    fn match_exists(&self, lost_id: Uuid, found_id: Uuid) -> Result<bool, StoreError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let table = read_txn
            .open_table(MATCH_TABLE)
            .map_err(|e| StoreError::backend(e.to_string()))?;
        let hit = table
            .get(match_key(lost_id, found_id).as_str())
            .map_err(|e| StoreError::backend(e.to_string()))?;
        Ok(hit.is_some())
    }

    fn insert_matches(&self, records: &[MatchRecord]) -> Result<(), StoreError> {
        self.persist_run(records, &[])
    }

    fn insert_notifications(&self, records: &[Notification]) -> Result<(), StoreError> {
        self.persist_run(&[], records)
    }

    /// One write transaction for the whole run: either every match and every
    /// notification lands, or none do. This strengthens the source behavior
    /// of two separate bulk inserts.
    fn persist_run(
        &self,
        matches: &[MatchRecord],
        notifications: &[Notification],
    ) -> Result<(), StoreError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StoreError::backend(e.to_string()))?;
        {
            let mut match_table = write_txn
                .open_table(MATCH_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            for record in matches {
                let bytes = serde_json::to_vec(record)?;
                match_table
                    .insert(
                        match_key(record.lost_item_id, record.found_item_id).as_str(),
                        bytes.as_slice(),
                    )
                    .map_err(|e| StoreError::backend(e.to_string()))?;
            }

            let mut note_table = write_txn
                .open_table(NOTIFICATION_TABLE)
                .map_err(|e| StoreError::backend(e.to_string()))?;
            for record in notifications {
                let bytes = serde_json::to_vec(record)?;
                note_table
                    .insert(record.id.to_string().as_str(), bytes.as_slice())
                    .map_err(|e| StoreError::backend(e.to_string()))?;
            }
        }
        write_txn
            .commit()
            .map_err(|e| StoreError::backend(e.to_string()))
    }

    fn insert_lost(&self, report: &LostReport) -> Result<(), StoreError> {
        self.put(LOST_TABLE, report.id.to_string().as_str(), report)
    }

    fn insert_found(&self, report: &FoundReport) -> Result<(), StoreError> {
        self.put(FOUND_TABLE, report.id.to_string().as_str(), report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn store() -> (RedbStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("refind.redb")).unwrap();
        (store, dir)
    }

    fn lost_report() -> LostReport {
        LostReport {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            item_name: "Backpack".into(),
            category: "Bags".into(),
            description: "navy blue backpack".into(),
            location_lost: "Lecture hall".into(),
            date_lost: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            image_url: None,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reports_round_trip_through_the_file() {
        let (store, _dir) = store();
        let report = lost_report();
        store.insert_lost(&report).unwrap();

        let pending = store.pending_lost().unwrap();
        assert_eq!(pending, vec![report]);
    }

    #[test]
    fn matched_reports_are_filtered_out() {
        let (store, _dir) = store();
        let mut report = lost_report();
        report.status = ReportStatus::Matched;
        store.insert_lost(&report).unwrap();
        assert!(store.pending_lost().unwrap().is_empty());
    }

    #[test]
    fn persist_run_commits_matches_and_notifications_together() {
        let (store, _dir) = store();
        let (lost_id, found_id) = (Uuid::new_v4(), Uuid::new_v4());
        let record = MatchRecord {
            id: Uuid::new_v4(),
            lost_item_id: lost_id,
            found_item_id: found_id,
            score: 85,
            reason: "Same category (Bags), Similar item name".into(),
            status: Default::default(),
            created_at: Utc::now(),
        };
        let note = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Potential Match Found!".into(),
            message: "msg".into(),
            kind: crate::reports::NotificationKind::MatchFound,
            read: false,
            related_item_id: Some(lost_id),
            created_at: Utc::now(),
        };

        store
            .persist_run(std::slice::from_ref(&record), std::slice::from_ref(&note))
            .unwrap();

        assert!(store.match_exists(lost_id, found_id).unwrap());
        let notes: Vec<Notification> = store.scan_table(NOTIFICATION_TABLE).unwrap();
        assert_eq!(notes, vec![note]);
    }

    #[test]
    fn pair_key_dedupes_duplicate_match_rows() {
        let (store, _dir) = store();
        let (lost_id, found_id) = (Uuid::new_v4(), Uuid::new_v4());
        for _ in 0..2 {
            let record = MatchRecord {
                id: Uuid::new_v4(),
                lost_item_id: lost_id,
                found_item_id: found_id,
                score: 50,
                reason: String::new(),
                status: Default::default(),
                created_at: Utc::now(),
            };
            store.insert_matches(std::slice::from_ref(&record)).unwrap();
        }
        let rows: Vec<MatchRecord> = store.scan_table(MATCH_TABLE).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
