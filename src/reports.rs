//! Report and match records exchanged between the store and the engine.
//!
//! `LostReport` and `FoundReport` are deliberately two concrete types rather
//! than one generic report with optional fields: the location/date field names
//! differ, and the two kinds occupy asymmetric sides of a match. Keeping them
//! separate makes field presence statically guaranteed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a lost or found report.
///
/// Only `Pending` reports participate in matching runs. The engine never
/// transitions this status itself; confirmation is a manual workflow that
/// belongs to the surrounding application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Pending,
    Matched,
    Closed,
}

/// Status of a recorded match, mutated by user action outside the engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    #[default]
    Pending,
    Confirmed,
    Rejected,
}

/// A report filed by a user who lost an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LostReport {
    pub id: Uuid,
    /// Reporting user; the lost-side notification is addressed here.
    pub user_id: Uuid,
    pub item_name: String,
    /// Category tag, compared exactly as stored (case-sensitive).
    pub category: String,
    pub description: String,
    pub location_lost: String,
    /// Calendar date only; the source schema has no time component.
    pub date_lost: NaiveDate,
    /// Opaque image reference; never inspected by the engine.
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// A report filed by a user who found an item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FoundReport {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_name: String,
    pub category: String,
    pub description: String,
    pub location_found: String,
    pub date_found: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// A scored pairing of one lost report with one found report.
///
/// The `(lost_item_id, found_item_id)` pair is the natural key: at most one
/// record may ever exist per pair, across all runs. Created only by the
/// engine; its status is later mutated by the reporters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchRecord {
    pub id: Uuid,
    pub lost_item_id: Uuid,
    pub found_item_id: Uuid,
    /// Additive signal total. Not clamped: the four signals sum to 110 when
    /// every contribution fires maximally, and the source never caps it.
    pub score: u32,
    /// Human-readable explanation, comma-joined signal fragments.
    pub reason: String,
    #[serde(default)]
    pub status: MatchStatus,
    pub created_at: DateTime<Utc>,
}

/// Kind tag on a notification, serialized in snake_case as stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    MatchFound,
}

/// An inbox entry addressed to one reporter.
///
/// Notifications are created in pairs, one per side of a [`MatchRecord`], in
/// the same run that creates the record — never on their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    /// Target user.
    pub user_id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    /// The recipient's own report, for inbox lookup convenience.
    #[serde(default)]
    pub related_item_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_kind_serializes_as_stored_tag() {
        let json = serde_json::to_value(NotificationKind::MatchFound).unwrap();
        assert_eq!(json, serde_json::json!("match_found"));
    }

    #[test]
    fn report_status_round_trips_lowercase() {
        for (status, tag) in [
            (ReportStatus::Pending, "\"pending\""),
            (ReportStatus::Matched, "\"matched\""),
            (ReportStatus::Closed, "\"closed\""),
        ] {
            assert_eq!(serde_json::to_string(&status).unwrap(), tag);
            let back: ReportStatus = serde_json::from_str(tag).unwrap();
            assert_eq!(back, status);
        }
    }

    #[test]
    fn notification_type_field_name_matches_schema() {
        let note = Notification {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Potential Match Found!".into(),
            message: "msg".into(),
            kind: NotificationKind::MatchFound,
            read: false,
            related_item_id: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["type"], "match_found");
        assert_eq!(value["read"], false);
    }
}
