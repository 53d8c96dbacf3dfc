//! Reverse-geocoding proximity cache stored in `SQLite`.
//!
//! Rows are keyed by the coordinate rounded to five decimal places, with
//! the raw latitude and longitude alongside for distance checks. Lookups
//! pre-filter on an indexed latitude band before computing true
//! great-circle distances, so the table can grow without full scans.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, Row, params};
use saarthi_geo::distance_km;
use saarthi_geocoder::{CachedAddress, GeocodeCache, GeocodeError, coord_key};
use tokio::sync::Mutex;

use crate::StoreError;
use crate::sqlite::decode_json;

/// One degree of latitude in kilometers, used to widen the query radius
/// into the indexed latitude band.
const KM_PER_DEGREE_LAT: f64 = 111.0;

/// Persistent [`GeocodeCache`] backed by a `SQLite` database file.
pub struct SqliteGeocodeCache {
    conn: Mutex<Connection>,
}

impl SqliteGeocodeCache {
    /// Opens (or creates) the cache database at `path`.
    ///
    /// The file may be shared with [`crate::sqlite::SqliteStore`]; both
    /// use their own tables.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be opened or schema
    /// creation fails.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::debug!("Opening geocode cache at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory cache, for tests and ephemeral runs.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if schema creation fails.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lookup(
        conn: &Connection,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Option<CachedAddress>, StoreError> {
        let band = radius_km / KM_PER_DEGREE_LAT;
        let mut stmt = conn.prepare(
            "SELECT latitude, longitude, formatted_address, components
             FROM geocode_cache
             WHERE latitude BETWEEN ?1 AND ?2",
        )?;
        let candidates = stmt
            .query_map(params![lat - band, lat + band], row_to_cached)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let best = candidates
            .into_iter()
            .map(|address| {
                let distance = distance_km(lat, lng, address.latitude, address.longitude);
                (address, distance)
            })
            .filter(|(_, distance)| *distance < radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        Ok(best.map(|(address, _)| address))
    }

    fn insert(conn: &Connection, address: &CachedAddress) -> Result<(), StoreError> {
        conn.execute(
            "INSERT OR REPLACE INTO geocode_cache
                 (coord_key, latitude, longitude, formatted_address, components, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                coord_key(address.latitude, address.longitude),
                address.latitude,
                address.longitude,
                address.formatted_address,
                serde_json::to_string(&address.components)?,
                Utc::now(),
            ],
        )?;
        Ok(())
    }
}

fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS geocode_cache (
            coord_key         TEXT PRIMARY KEY,
            latitude          REAL NOT NULL,
            longitude         REAL NOT NULL,
            formatted_address TEXT NOT NULL,
            components        TEXT NOT NULL,
            created_at        TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_geocode_latitude
            ON geocode_cache (latitude);",
    )?;
    Ok(())
}

fn row_to_cached(row: &Row<'_>) -> rusqlite::Result<CachedAddress> {
    let components: String = row.get(3)?;
    Ok(CachedAddress {
        latitude: row.get(0)?,
        longitude: row.get(1)?,
        formatted_address: row.get(2)?,
        components: decode_json(3, &components)?,
    })
}

fn cache_error(e: &StoreError) -> GeocodeError {
    GeocodeError::Cache {
        message: e.to_string(),
    }
}

#[async_trait]
impl GeocodeCache for SqliteGeocodeCache {
    async fn nearest_within(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Option<CachedAddress>, GeocodeError> {
        let conn = self.conn.lock().await;
        Self::lookup(&conn, lat, lng, radius_km).map_err(|e| cache_error(&e))
    }

    async fn store(&self, address: &CachedAddress) -> Result<(), GeocodeError> {
        let conn = self.conn.lock().await;
        Self::insert(&conn, address).map_err(|e| cache_error(&e))
    }
}

#[cfg(test)]
mod tests {
    use saarthi_emergency_models::AddressComponents;

    use super::*;

    fn entry(lat: f64, lng: f64, formatted: &str) -> CachedAddress {
        CachedAddress {
            latitude: lat,
            longitude: lng,
            formatted_address: formatted.to_string(),
            components: AddressComponents {
                neighbourhood: Some("Rohini".to_string()),
                ..AddressComponents::default()
            },
        }
    }

    #[tokio::test]
    async fn hit_within_fifty_meters() {
        let cache = SqliteGeocodeCache::open_in_memory().unwrap();
        cache
            .store(&entry(28.7041, 77.1025, "Rohini, Delhi - 110085"))
            .await
            .unwrap();

        // ~6 m northeast of the stored point.
        let hit = cache
            .nearest_within(28.70415, 77.10252, 0.05)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.formatted_address, "Rohini, Delhi - 110085");
        assert_eq!(hit.components.neighbourhood.as_deref(), Some("Rohini"));
    }

    #[tokio::test]
    async fn miss_beyond_radius() {
        let cache = SqliteGeocodeCache::open_in_memory().unwrap();
        cache
            .store(&entry(28.7041, 77.1025, "Rohini, Delhi - 110085"))
            .await
            .unwrap();

        // ~111 m north of the stored point.
        let miss = cache.nearest_within(28.7051, 77.1025, 0.05).await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn prefers_closest_of_multiple_entries() {
        let cache = SqliteGeocodeCache::open_in_memory().unwrap();
        cache
            .store(&entry(28.70430, 77.10250, "Rohini Sector 8, Delhi"))
            .await
            .unwrap();
        cache
            .store(&entry(28.70410, 77.10250, "Rohini, Delhi - 110085"))
            .await
            .unwrap();

        let hit = cache
            .nearest_within(28.70412, 77.10250, 0.05)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.formatted_address, "Rohini, Delhi - 110085");
    }

    #[tokio::test]
    async fn same_key_overwrites() {
        let cache = SqliteGeocodeCache::open_in_memory().unwrap();
        cache
            .store(&entry(28.7041, 77.1025, "Old address"))
            .await
            .unwrap();
        cache
            .store(&entry(28.7041, 77.1025, "New address"))
            .await
            .unwrap();

        let hit = cache
            .nearest_within(28.7041, 77.1025, 0.05)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.formatted_address, "New address");
    }
}
