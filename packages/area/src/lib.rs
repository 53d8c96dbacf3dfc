#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map-area assignment and per-area alert clustering.
//!
//! Every emergency report is pinned to one of the fixed named areas at a
//! precision tier recording how the match was made: geocoded locality
//! component, proximity to an area center, a free-text mention, or the
//! city-wide default. [`alerts::cluster_by_area`] then folds assigned
//! reports into one map alert per area.

pub mod alerts;
pub mod registry;

use saarthi_emergency_models::EmergencyRecord;
use saarthi_geo::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

use crate::registry::NamedArea;

/// Reports with coordinates match the nearest area center within this
/// distance.
pub const AREA_MATCH_RADIUS_KM: f64 = 5.0;

/// Marker position for reports that cannot be pinned to any area.
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(28.6139, 77.2090);

/// Area label for reports with no recognizable location at all.
pub const UNKNOWN_AREA_LABEL: &str = "Unknown Location";

/// How an area assignment was made.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Precision {
    /// A geocoded locality component named the area.
    High,
    /// The report's coordinates fall within [`AREA_MATCH_RADIUS_KM`] of
    /// the area's center.
    Medium,
    /// The free-text location mentions the area.
    Low,
    /// Nothing matched; the report sits at [`DEFAULT_CENTER`].
    Unknown,
}

/// The area a report was pinned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaAssignment {
    /// Matched area name, or the unknown-tier label derived from the
    /// report's location text.
    pub area: String,
    /// Canonical center the report's marker is pinned to.
    pub center: Coordinate,
    /// How the match was made.
    pub precision: Precision,
}

/// Errors from area resolution.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AreaResolveError {
    /// The record carries coordinates that are NaN or infinite.
    #[error("non-finite coordinates ({lat}, {lng})")]
    NonFiniteCoordinates {
        /// Offending latitude.
        lat: f64,
        /// Offending longitude.
        lng: f64,
    },
}

/// Pins a report to an area, never failing.
///
/// Resolution tries, in order: the geocoded locality component against
/// the registry aliases (high precision), the nearest area center within
/// [`AREA_MATCH_RADIUS_KM`] (medium), and, only for reports without
/// coordinates, an alias mention in the free-text location (low). When
/// nothing matches, the first comma-separated token of the location text
/// labels the report at [`DEFAULT_CENTER`] (unknown).
///
/// Records that cannot be processed at all (non-finite coordinates) are
/// logged and collapse to the same unknown-tier default, so one bad
/// record never aborts a batch.
#[must_use]
pub fn resolve_area(record: &EmergencyRecord) -> AreaAssignment {
    match try_resolve(record) {
        Ok(assignment) => assignment,
        Err(e) => {
            log::warn!("Area resolution failed for report {}: {e}", record.id);
            unknown_assignment(&record.location)
        }
    }
}

/// Pins every record to an area. The output is positionally aligned
/// with `records`.
#[must_use]
pub fn assign_areas(records: &[EmergencyRecord]) -> Vec<AreaAssignment> {
    records.iter().map(resolve_area).collect()
}

fn try_resolve(record: &EmergencyRecord) -> Result<AreaAssignment, AreaResolveError> {
    if let Some(details) = &record.location_details {
        if let Some(area) = details.components.locality().and_then(registry::match_alias) {
            return Ok(matched(area, Precision::High));
        }

        let coords = details.coordinates;
        if !coords.is_finite() {
            return Err(AreaResolveError::NonFiniteCoordinates {
                lat: coords.lat,
                lng: coords.lng,
            });
        }

        let nearest = registry::all_areas()
            .iter()
            .map(|area| (area, coords.distance_km(area.center())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|(_, distance)| *distance < AREA_MATCH_RADIUS_KM);
        if let Some((area, _)) = nearest {
            return Ok(matched(area, Precision::Medium));
        }
    } else if let Some(area) = registry::match_alias(&record.location) {
        return Ok(matched(area, Precision::Low));
    }

    Ok(unknown_assignment(&record.location))
}

fn matched(area: &NamedArea, precision: Precision) -> AreaAssignment {
    AreaAssignment {
        area: area.name.clone(),
        center: area.center(),
        precision,
    }
}

fn unknown_assignment(location: &str) -> AreaAssignment {
    let first = location.split(',').next().unwrap_or("").trim();
    let area = if first.is_empty() {
        UNKNOWN_AREA_LABEL.to_string()
    } else {
        first.to_string()
    };

    AreaAssignment {
        area,
        center: DEFAULT_CENTER,
        precision: Precision::Unknown,
    }
}
