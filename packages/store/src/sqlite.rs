//! `SQLite`-backed report store.
//!
//! One table for reports, one for user profiles. Enum columns hold the
//! wire spellings (`"high"`, `"inProgress"`, ...) and nested values
//! (location details, report history) are JSON-encoded TEXT, so rows stay
//! readable with the `sqlite3` shell. Timestamps are RFC 3339 UTC
//! strings, which order correctly under lexicographic `ORDER BY`.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use saarthi_emergency_models::{
    EmergencyRecord, LocationDetails, NewEmergency, ReportHistoryEntry, ReportStatus, UserProfile,
};
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

use crate::{RecordStore, StoreError, record_from_draft};

/// Report store backed by a `SQLite` database file.
///
/// The connection is serialized behind a mutex; every call runs its SQL
/// synchronously while holding the lock.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    snapshots: watch::Sender<Vec<EmergencyRecord>>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or schema
    /// creation fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::debug!("Opening report store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database, for tests and ephemeral runs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if schema creation fails.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        create_schema(&conn)?;
        let (snapshots, _) = watch::channel(query_all(&conn)?);
        Ok(Self {
            conn: Mutex::new(conn),
            snapshots,
        })
    }

    fn publish(&self, conn: &Connection) -> Result<(), StoreError> {
        self.snapshots.send_replace(query_all(conn)?);
        Ok(())
    }
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS emergencies (
            id                     TEXT PRIMARY KEY,
            location               TEXT NOT NULL,
            description            TEXT NOT NULL,
            user_id                TEXT,
            user_name              TEXT NOT NULL,
            severity               TEXT NOT NULL,
            emergency_type         TEXT NOT NULL,
            status                 TEXT NOT NULL,
            auto_detected_location INTEGER NOT NULL,
            location_details       TEXT,
            created_at             TEXT NOT NULL,
            updated_at             TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_emergencies_created
            ON emergencies (created_at);
        CREATE INDEX IF NOT EXISTS idx_emergencies_user
            ON emergencies (user_id);
        CREATE TABLE IF NOT EXISTS user_profiles (
            user_id        TEXT PRIMARY KEY,
            name           TEXT NOT NULL,
            phone          TEXT,
            report_history TEXT NOT NULL
        );",
    )?;
    Ok(())
}

const RECORD_COLUMNS: &str = "id, location, description, user_id, user_name, severity, \
                              emergency_type, status, auto_detected_location, \
                              location_details, created_at, updated_at";

/// Parses a TEXT column through `FromStr`, reporting failures as column
/// conversion errors so they surface through the normal rusqlite path.
fn parse_column<T: FromStr>(idx: usize, raw: &str) -> rusqlite::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decodes a JSON TEXT column.
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(
    idx: usize,
    json: &str,
) -> rusqlite::Result<T> {
    serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<EmergencyRecord> {
    let severity: String = row.get(5)?;
    let emergency_type: String = row.get(6)?;
    let status: String = row.get(7)?;
    let details: Option<String> = row.get(9)?;
    let created_at: String = row.get(10)?;
    let updated_at: String = row.get(11)?;

    Ok(EmergencyRecord {
        id: row.get(0)?,
        location: row.get(1)?,
        description: row.get(2)?,
        user_id: row.get(3)?,
        user_name: row.get(4)?,
        severity: parse_column(5, &severity)?,
        emergency_type: parse_column(6, &emergency_type)?,
        status: parse_column(7, &status)?,
        auto_detected_location: row.get(8)?,
        location_details: details
            .as_deref()
            .map(|json| decode_json::<LocationDetails>(9, json))
            .transpose()?,
        created_at: parse_column::<DateTime<Utc>>(10, &created_at)?,
        updated_at: parse_column::<DateTime<Utc>>(11, &updated_at)?,
    })
}

fn row_to_profile(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let history: String = row.get(3)?;
    Ok(UserProfile {
        user_id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        report_history: decode_json::<Vec<ReportHistoryEntry>>(3, &history)?,
    })
}

fn query_all(conn: &Connection) -> Result<Vec<EmergencyRecord>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM emergencies ORDER BY created_at DESC"
    ))?;
    let records = stmt
        .query_map([], row_to_record)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(records)
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn add_emergency(&self, draft: NewEmergency) -> Result<EmergencyRecord, StoreError> {
        let record = record_from_draft(draft, Uuid::new_v4().to_string(), Utc::now());
        let details_json = record
            .location_details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO emergencies (id, location, description, user_id, user_name, severity,
                                      emergency_type, status, auto_detected_location,
                                      location_details, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.id,
                record.location,
                record.description,
                record.user_id,
                record.user_name,
                record.severity.to_string(),
                record.emergency_type.to_string(),
                record.status.to_string(),
                record.auto_detected_location,
                details_json,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339(),
            ],
        )?;

        self.publish(&conn)?;
        Ok(record)
    }

    async fn get_emergency(&self, id: &str) -> Result<Option<EmergencyRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM emergencies WHERE id = ?1"),
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    async fn list_emergencies(&self) -> Result<Vec<EmergencyRecord>, StoreError> {
        let conn = self.conn.lock().await;
        query_all(&conn)
    }

    async fn list_user_emergencies(
        &self,
        user_id: &str,
    ) -> Result<Vec<EmergencyRecord>, StoreError> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM emergencies
             WHERE user_id = ?1
             ORDER BY created_at DESC"
        ))?;
        let records = stmt
            .query_map(params![user_id], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<EmergencyRecord, StoreError> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE emergencies SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.to_string(), Utc::now().to_rfc3339(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        let record = conn.query_row(
            &format!("SELECT {RECORD_COLUMNS} FROM emergencies WHERE id = ?1"),
            params![id],
            row_to_record,
        )?;

        self.publish(&conn)?;
        Ok(record)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let conn = self.conn.lock().await;
        let profile = conn
            .query_row(
                "SELECT user_id, name, phone, report_history
                 FROM user_profiles WHERE user_id = ?1",
                params![user_id],
                row_to_profile,
            )
            .optional()?;
        Ok(profile)
    }

    async fn append_report_history(
        &self,
        user_id: &str,
        name: &str,
        entry: ReportHistoryEntry,
    ) -> Result<(), StoreError> {
        let conn = self.conn.lock().await;
        let existing: Option<String> = conn
            .query_row(
                "SELECT report_history FROM user_profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(raw) = existing {
            let mut history: Vec<ReportHistoryEntry> = serde_json::from_str(&raw)?;
            history.push(entry);
            conn.execute(
                "UPDATE user_profiles SET report_history = ?1 WHERE user_id = ?2",
                params![serde_json::to_string(&history)?, user_id],
            )?;
        } else {
            conn.execute(
                "INSERT INTO user_profiles (user_id, name, phone, report_history)
                 VALUES (?1, ?2, NULL, ?3)",
                params![user_id, name, serde_json::to_string(&[entry])?],
            )?;
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<EmergencyRecord>> {
        self.snapshots.subscribe()
    }
}
