//! Compile-time registry of named map areas.
//!
//! The area table lives in `areas/delhi.toml` and is embedded at compile
//! time. Each entry carries the canonical center that alerts for the area
//! are pinned to, plus the lower-case alias substrings used to recognize
//! the area in geocoded components and free-text locations. Adding an
//! area means editing the TOML file and bumping the count test.

use std::sync::LazyLock;

use saarthi_geo::Coordinate;
use serde::Deserialize;

/// A named map area with its canonical center and match aliases.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedArea {
    /// Area name as it appears on map alerts.
    pub name: String,
    /// Canonical center latitude.
    pub lat: f64,
    /// Canonical center longitude.
    pub lng: f64,
    /// Lower-case substrings that identify the area in address
    /// components and free-text locations.
    pub aliases: Vec<String>,
}

impl NamedArea {
    /// The area's canonical center coordinate.
    #[must_use]
    pub const fn center(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

#[derive(Debug, Deserialize)]
struct AreaFile {
    areas: Vec<NamedArea>,
}

const DELHI_AREAS_TOML: &str = include_str!("../areas/delhi.toml");

#[cfg(test)]
const EXPECTED_AREA_COUNT: usize = 12;

static AREAS: LazyLock<Vec<NamedArea>> = LazyLock::new(|| {
    let file: AreaFile = toml::de::from_str(DELHI_AREAS_TOML)
        .unwrap_or_else(|e| panic!("Failed to parse area registry: {e}"));
    file.areas
});

/// Returns the embedded area registry.
///
/// # Panics
///
/// Panics on first access if the embedded TOML is malformed (a
/// compile-time guarantee in practice since the file is embedded).
#[must_use]
pub fn all_areas() -> &'static [NamedArea] {
    &AREAS
}

/// Finds the first area with an alias appearing in `text`,
/// case-insensitively. Registry order decides ties.
#[must_use]
pub fn match_alias(text: &str) -> Option<&'static NamedArea> {
    let lower = text.to_lowercase();
    all_areas()
        .iter()
        .find(|area| area.aliases.iter().any(|alias| lower.contains(alias.as_str())))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn loads_all_areas() {
        assert_eq!(
            all_areas().len(),
            EXPECTED_AREA_COUNT,
            "Expected {EXPECTED_AREA_COUNT} areas, found {}. \
             Update EXPECTED_AREA_COUNT after adding/removing areas.",
            all_areas().len()
        );
    }

    #[test]
    fn area_names_are_unique() {
        let mut seen = BTreeSet::new();
        for area in all_areas() {
            assert!(seen.insert(&area.name), "Duplicate area name: {}", area.name);
        }
    }

    #[test]
    fn aliases_are_lowercase_and_nonempty() {
        for area in all_areas() {
            assert!(!area.aliases.is_empty(), "Area {} has no aliases", area.name);
            for alias in &area.aliases {
                assert!(!alias.is_empty(), "Area {} has an empty alias", area.name);
                assert_eq!(
                    alias,
                    &alias.to_lowercase(),
                    "Area {} alias '{alias}' is not lower-case",
                    area.name
                );
            }
        }
    }

    #[test]
    fn every_name_matches_its_own_area() {
        for area in all_areas() {
            let matched = match_alias(&area.name);
            assert_eq!(
                matched.map(|found| found.name.as_str()),
                Some(area.name.as_str()),
                "Area name '{}' did not match its own entry",
                area.name
            );
        }
    }

    #[test]
    fn match_is_case_insensitive_substring() {
        let area = match_alias("Near LAXMI NAGAR metro station").unwrap();
        assert_eq!(area.name, "Laxmi Nagar");
        assert!(match_alias("Karol Bagh main market").is_none());
    }
}
