//! In-memory store backends for tests and ephemeral runs.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use saarthi_emergency_models::{
    EmergencyRecord, NewEmergency, ReportHistoryEntry, ReportStatus, UserProfile,
};
use saarthi_geo::distance_km;
use saarthi_geocoder::{CachedAddress, GeocodeCache, GeocodeError, coord_key};
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use crate::{RecordStore, StoreError, record_from_draft};

/// Report store held entirely in process memory.
pub struct MemoryStore {
    records: RwLock<Vec<EmergencyRecord>>,
    profiles: RwLock<BTreeMap<String, UserProfile>>,
    snapshots: watch::Sender<Vec<EmergencyRecord>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        let (snapshots, _) = watch::channel(Vec::new());
        Self {
            records: RwLock::new(Vec::new()),
            profiles: RwLock::new(BTreeMap::new()),
            snapshots,
        }
    }

    fn publish(&self, records: &[EmergencyRecord]) {
        self.snapshots.send_replace(newest_first(records));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn newest_first(records: &[EmergencyRecord]) -> Vec<EmergencyRecord> {
    let mut list = records.to_vec();
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    list
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn add_emergency(&self, draft: NewEmergency) -> Result<EmergencyRecord, StoreError> {
        let record = record_from_draft(draft, Uuid::new_v4().to_string(), Utc::now());

        let mut records = self.records.write().await;
        records.push(record.clone());
        self.publish(&records);
        Ok(record)
    }

    async fn get_emergency(&self, id: &str) -> Result<Option<EmergencyRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn list_emergencies(&self) -> Result<Vec<EmergencyRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(newest_first(&records))
    }

    async fn list_user_emergencies(
        &self,
        user_id: &str,
    ) -> Result<Vec<EmergencyRecord>, StoreError> {
        let records = self.records.read().await;
        let own: Vec<EmergencyRecord> = records
            .iter()
            .filter(|record| record.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        Ok(newest_first(&own))
    }

    async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
    ) -> Result<EmergencyRecord, StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        record.status = status;
        record.updated_at = Utc::now();
        let updated = record.clone();

        self.publish(&records);
        Ok(updated)
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }

    async fn append_report_history(
        &self,
        user_id: &str,
        name: &str,
        entry: ReportHistoryEntry,
    ) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile {
                user_id: user_id.to_string(),
                name: name.to_string(),
                phone: None,
                report_history: Vec::new(),
            });
        profile.report_history.push(entry);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Vec<EmergencyRecord>> {
        self.snapshots.subscribe()
    }
}

/// Reverse-geocoding proximity cache held in process memory.
#[derive(Default)]
pub struct MemoryGeocodeCache {
    entries: RwLock<BTreeMap<String, CachedAddress>>,
}

impl MemoryGeocodeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GeocodeCache for MemoryGeocodeCache {
    async fn nearest_within(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Option<CachedAddress>, GeocodeError> {
        let entries = self.entries.read().await;

        let best = entries
            .values()
            .map(|address| {
                let distance = distance_km(lat, lng, address.latitude, address.longitude);
                (address, distance)
            })
            .filter(|(_, distance)| *distance < radius_km)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        Ok(best.map(|(address, _)| address.clone()))
    }

    async fn store(&self, address: &CachedAddress) -> Result<(), GeocodeError> {
        let key = coord_key(address.latitude, address.longitude);
        self.entries.write().await.insert(key, address.clone());
        Ok(())
    }
}
