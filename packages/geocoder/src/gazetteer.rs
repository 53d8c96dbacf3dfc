//! Compile-time gazetteer of Delhi-area centers.
//!
//! The fallback table lives in `areas/delhi.toml` and is embedded at
//! compile time. When the external provider yields nothing, the nearest
//! area within its own radius supplies a synthesized address; anything
//! further away gets a generic city-level address.

use std::sync::LazyLock;

use saarthi_emergency_models::AddressComponents;
use saarthi_geo::Coordinate;
use serde::Deserialize;

use crate::AddressResult;

/// Confidence reported for gazetteer hits.
pub const GAZETTEER_CONFIDENCE: u8 = 7;

/// Confidence reported for the generic city-level fallback.
pub const GENERIC_CONFIDENCE: u8 = 5;

/// A named area in the fallback gazetteer.
#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerArea {
    /// Area name as it appears in synthesized addresses.
    pub name: String,
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Match radius in km around the center.
    pub radius_km: f64,
    /// Postal code used in synthesized addresses.
    pub pincode: String,
}

impl GazetteerArea {
    /// The area's center coordinate.
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Deserialize)]
struct AreaFile {
    areas: Vec<GazetteerArea>,
}

const DELHI_AREAS_TOML: &str = include_str!("../areas/delhi.toml");

#[cfg(test)]
const EXPECTED_AREA_COUNT: usize = 12;

static AREAS: LazyLock<Vec<GazetteerArea>> = LazyLock::new(|| {
    let file: AreaFile = toml::de::from_str(DELHI_AREAS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse gazetteer areas: {e}"));
    file.areas
});

/// Returns the embedded gazetteer areas.
///
/// # Panics
///
/// Panics on first access if the embedded TOML is malformed (a
/// compile-time guarantee in practice since the file is embedded).
#[must_use]
pub fn all_areas() -> &'static [GazetteerArea] {
    &AREAS
}

/// Synthesizes a fallback address for coordinates the provider could not
/// resolve.
///
/// Finds the nearest gazetteer area; when the query point lies within
/// that area's own radius the result is `"{area}, Delhi - {pincode}"`
/// with confidence 7, otherwise a generic city-level address with
/// confidence 5.
#[must_use]
pub fn fallback_address(lat: f64, lng: f64) -> AddressResult {
    let query = Coordinate::new(lat, lng);

    let closest = all_areas()
        .iter()
        .map(|area| (area, query.distance_km(area.center())))
        .min_by(|a, b| a.1.total_cmp(&b.1));

    match closest {
        Some((area, distance)) if distance <= area.radius_km => AddressResult {
            formatted_address: format!("{}, Delhi - {}", area.name, area.pincode),
            components: AddressComponents {
                neighbourhood: Some(area.name.clone()),
                city: Some("Delhi".to_string()),
                postcode: Some(area.pincode.clone()),
                country: Some("India".to_string()),
                ..AddressComponents::default()
            },
            coords: query,
            confidence: GAZETTEER_CONFIDENCE,
            cached: false,
        },
        _ => AddressResult {
            formatted_address: format!("Delhi, India (Coordinates: {lat:.5}, {lng:.5})"),
            components: AddressComponents {
                city: Some("Delhi".to_string()),
                country: Some("India".to_string()),
                ..AddressComponents::default()
            },
            coords: query,
            confidence: GENERIC_CONFIDENCE,
            cached: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn loads_all_areas() {
        assert_eq!(all_areas().len(), EXPECTED_AREA_COUNT);
    }

    #[test]
    fn area_names_are_unique() {
        let mut seen = BTreeSet::new();
        for area in all_areas() {
            assert!(seen.insert(&area.name), "Duplicate area name: {}", area.name);
        }
    }

    #[test]
    fn areas_have_required_fields() {
        for area in all_areas() {
            assert!(!area.name.is_empty(), "Area has empty name");
            assert!(
                !area.pincode.is_empty(),
                "Area {} has empty pincode",
                area.name
            );
            assert!(
                area.radius_km > 0.0,
                "Area {} has non-positive radius",
                area.name
            );
        }
    }

    #[test]
    fn center_point_resolves_to_area() {
        let result = fallback_address(28.7041, 77.1025);
        assert_eq!(result.formatted_address, "Rohini, Delhi - 110085");
        assert_eq!(result.confidence, GAZETTEER_CONFIDENCE);
        assert_eq!(result.components.neighbourhood.as_deref(), Some("Rohini"));
        assert_eq!(result.components.postcode.as_deref(), Some("110085"));
        assert!(!result.cached);
    }

    #[test]
    fn every_center_resolves_to_its_own_area() {
        for area in all_areas() {
            let result = fallback_address(area.lat, area.lng);
            assert_eq!(
                result.formatted_address,
                format!("{}, Delhi - {}", area.name, area.pincode)
            );
        }
    }

    #[test]
    fn far_point_gets_generic_address() {
        let result = fallback_address(28.0, 76.0);
        assert_eq!(
            result.formatted_address,
            "Delhi, India (Coordinates: 28.00000, 76.00000)"
        );
        assert_eq!(result.confidence, GENERIC_CONFIDENCE);
        assert_eq!(result.components.city.as_deref(), Some("Delhi"));
        assert!(result.components.neighbourhood.is_none());
    }
}
