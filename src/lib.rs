//! # refind
//!
//! Core of a campus lost-and-found registry: the **matching engine**. A run
//! compares every pending lost-item report against every pending found-item
//! report, scores each pair on four additive signals, records pairs at or
//! above the threshold exactly once, and drafts paired notifications for both
//! reporters. The surrounding application (report forms, inbox, dashboards)
//! lives elsewhere and reaches the same data through the [`store::MatchStore`]
//! seam.
//!
//! ## Core Types
//!
//! - [`reports::LostReport`] / [`reports::FoundReport`]: the two report
//!   kinds, kept as distinct types because they sit on asymmetric sides of a
//!   match.
//! - [`scorer::score`]: pure pair scorer returning points and a
//!   human-readable reason.
//! - [`engine::MatchEngine`]: the batch orchestrator; runs are serialized
//!   and idempotent with respect to already-recorded pairs.
//! - [`store::MatchStore`]: persistence seam with in-memory and redb
//!   backends, selected via [`store::StoreConfig`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use refind::engine::MatchEngine;
//! use refind::store::StoreConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = StoreConfig::redb("/data/refind.redb").build()?;
//! let engine = MatchEngine::new(store);
//! let summary = engine.run()?;
//! println!("created {} matches", summary.matches_found);
//! # Ok(())
//! # }
//! ```
//!
//! The HTTP trigger surface ([`server::start_server`]) exposes the same run
//! as `POST /api/v1/match/run`, returning
//! `{"success": true, "matchesFound": n, "message": "..."}`.

pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod reports;
pub mod routes;
pub mod scorer;
pub mod server;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use engine::{EngineError, MatchEngine, RunSummary, MATCH_THRESHOLD};
pub use error::{ServerError, ServerResult};
pub use metrics::{set_run_metrics, RunMetrics};
pub use reports::{
    FoundReport, LostReport, MatchRecord, MatchStatus, Notification, NotificationKind,
    ReportStatus,
};
pub use scorer::{score, PairScore};
pub use server::{build_router, start_server};
pub use store::{InMemoryStore, MatchStore, RedbStore, StoreConfig, StoreError};
