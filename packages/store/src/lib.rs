#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Emergency report persistence.
//!
//! Defines the [`RecordStore`] seam the HTTP layer talks to, with two
//! backends: [`memory::MemoryStore`] for tests and ephemeral runs, and
//! [`sqlite::SqliteStore`] for durable single-node deployments. The
//! `SQLite` backend also hosts [`geocode_cache::SqliteGeocodeCache`], the
//! persistent half of the reverse-geocoding proximity cache.
//!
//! Every mutation republishes the full newest-first record list on a
//! watch channel; [`RecordStore::subscribe`] hands out receivers, which
//! is how live map and dashboard views observe changes.

pub mod geocode_cache;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use saarthi_emergency_models::{
    EmergencyRecord, NewEmergency, ReportHistoryEntry, ReportStatus, UserProfile,
};
use thiserror::Error;
use tokio::sync::watch;

/// Errors from report store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database query or command failed.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding of a stored column failed.
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),

    /// No record exists with the requested id.
    #[error("No record with id {id}")]
    NotFound {
        /// The id that was requested.
        id: String,
    },
}

/// Persistence seam for emergency reports and user profiles.
///
/// Reports are append-only apart from status changes; nothing is ever
/// deleted.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists a new report, assigning its id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn add_emergency(&self, draft: NewEmergency) -> Result<EmergencyRecord, StoreError>;

    /// Fetches a single report by id, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    async fn get_emergency(&self, id: &str) -> Result<Option<EmergencyRecord>, StoreError>;

    /// Returns all reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    async fn list_emergencies(&self) -> Result<Vec<EmergencyRecord>, StoreError>;

    /// Returns the given user's reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    async fn list_user_emergencies(
        &self,
        user_id: &str,
    ) -> Result<Vec<EmergencyRecord>, StoreError>;

    /// Sets a report's status and bumps its `updated_at` timestamp,
    /// returning the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no report has the given id,
    /// or another [`StoreError`] if the write fails.
    async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<EmergencyRecord, StoreError>;

    /// Fetches a user profile, or `None` when the user has none yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the read fails.
    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Appends an entry to a user's report history, creating the profile
    /// with `name` when it does not exist yet. An existing profile's name
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the write fails.
    async fn append_report_history(
        &self,
        user_id: &str,
        name: &str,
        entry: ReportHistoryEntry,
    ) -> Result<(), StoreError>;

    /// Subscribes to the record list. The receiver holds the current
    /// newest-first snapshot and is notified after every mutation.
    fn subscribe(&self) -> watch::Receiver<Vec<EmergencyRecord>>;
}

/// Builds the persisted record for a draft, stamping both timestamps
/// with `now`.
pub(crate) fn record_from_draft(
    draft: NewEmergency,
    id: String,
    now: DateTime<Utc>,
) -> EmergencyRecord {
    EmergencyRecord {
        id,
        location: draft.location,
        description: draft.description,
        user_id: draft.user_id,
        user_name: draft.user_name,
        severity: draft.severity,
        emergency_type: draft.emergency_type,
        status: draft.status,
        auto_detected_location: draft.auto_detected_location,
        location_details: draft.location_details,
        created_at: now,
        updated_at: now,
    }
}
