#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reverse geocoding for emergency reports.
//!
//! Resolves device coordinates to a human-readable address using a
//! three-step strategy, each step running only when the previous one
//! produced nothing usable:
//!
//! 1. **Proximity cache** — a previously resolved address within 50 m of
//!    the query point.
//! 2. **`OpenCage`** — the external reverse-geocoding provider; successful
//!    resolutions are written back to the cache.
//! 3. **Local gazetteer** — a fixed table of Delhi-area centers embedded
//!    from `areas/delhi.toml`, consulted when the provider fails or
//!    returns nothing.
//!
//! The resolver never fails: provider and cache errors are logged and
//! demoted to "no result" so callers always receive an address.

pub mod gazetteer;
pub mod opencage;
pub mod position;
pub mod resolver;

use async_trait::async_trait;
use saarthi_emergency_models::AddressComponents;
use saarthi_geo::Coordinate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cache hits must lie within this distance of the query point.
pub const CACHE_PROXIMITY_KM: f64 = 0.05;

/// Confidence reported for cache hits.
pub const CACHE_HIT_CONFIDENCE: u8 = 9;

/// A resolved address with provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressResult {
    /// Human-readable address line.
    pub formatted_address: String,
    /// Structured address components.
    pub components: AddressComponents,
    /// The coordinates the address was resolved for.
    pub coords: Coordinate,
    /// Resolution confidence, 0-10. Cache hits report 9, gazetteer hits
    /// 7, the generic city fallback 5; otherwise the provider's value.
    pub confidence: u8,
    /// Whether this result came from the proximity cache.
    pub cached: bool,
}

/// A previously resolved address as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedAddress {
    /// Latitude the address was originally resolved for.
    pub latitude: f64,
    /// Longitude the address was originally resolved for.
    pub longitude: f64,
    /// Human-readable address line.
    pub formatted_address: String,
    /// Structured address components.
    pub components: AddressComponents,
}

/// A single result from the reverse-geocoding provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderAddress {
    /// Human-readable address line.
    pub formatted: String,
    /// Structured address components.
    pub components: AddressComponents,
    /// Provider-supplied confidence, 0-10.
    pub confidence: u8,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Cache read or write failed.
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache failure.
        message: String,
    },
}

/// Proximity cache of previously resolved coordinates.
#[async_trait]
pub trait GeocodeCache: Send + Sync {
    /// Returns the stored address closest to the query point within
    /// `radius_km`, or `None` when nothing is close enough.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Cache`] if the underlying store fails.
    async fn nearest_within(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<Option<CachedAddress>, GeocodeError>;

    /// Stores a resolved address keyed by its coordinates rounded to five
    /// decimal places.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Cache`] if the underlying store fails.
    async fn store(&self, address: &CachedAddress) -> Result<(), GeocodeError>;
}

/// External reverse-geocoding provider.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Resolves coordinates to the provider's top-ranked address, or
    /// `None` when the provider has no result for the point.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the HTTP request or response parsing
    /// fails.
    async fn reverse(&self, lat: f64, lng: f64) -> Result<Option<ProviderAddress>, GeocodeError>;
}

/// Cache key for a coordinate pair, rounded to five decimal places
/// (roughly 1 m resolution).
#[must_use]
pub fn coord_key(lat: f64, lng: f64) -> String {
    format!("{lat:.5}_{lng:.5}")
}
