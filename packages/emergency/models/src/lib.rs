#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Emergency report taxonomy and record types.
//!
//! This crate defines the canonical emergency categories, severity levels,
//! and persisted record shapes used across the Saarthi system. Wire
//! spellings (camelCase field names, lowercase enum values) match the JSON
//! documents the dashboard and map clients consume.

use chrono::{DateTime, NaiveDate, Utc};
use saarthi_geo::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Emergency category assigned by the keyword classifier.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EmergencyType {
    /// No category keyword matched the description.
    #[default]
    General,
    /// Fire, smoke, or burning.
    Fire,
    /// Flooding and waterlogging.
    Flood,
    /// Road and vehicle accidents.
    Accident,
    /// Medical distress and injuries.
    Medical,
    /// Theft, assault, and other crimes in progress.
    Crime,
    /// Building or structure damage.
    Structural,
}

impl EmergencyType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::General,
            Self::Fire,
            Self::Flood,
            Self::Accident,
            Self::Medical,
            Self::Crime,
            Self::Structural,
        ]
    }
}

/// Severity level for an emergency report, from 1 (low) to 3 (high).
///
/// Older map documents spell the middle level `"mid"`; deserialization
/// accepts both spellings.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Level 1: minor, stable, or already handled.
    Low = 1,
    /// Level 2: default when no severity keyword matches.
    #[default]
    #[serde(alias = "mid")]
    Medium = 2,
    /// Level 3: life-threatening or rapidly escalating.
    High = 3,
}

impl Severity {
    /// Returns the numeric rank of this severity level.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Creates a severity level from a numeric rank.
    ///
    /// # Errors
    ///
    /// Returns an error if the rank is not in the range 1-3.
    pub const fn from_rank(rank: u8) -> Result<Self, InvalidSeverityRank> {
        match rank {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            _ => Err(InvalidSeverityRank { rank }),
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High]
    }
}

/// Error returned when attempting to create a [`Severity`] from an invalid
/// numeric rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSeverityRank {
    /// The invalid rank that was provided.
    pub rank: u8,
}

impl std::fmt::Display for InvalidSeverityRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid severity rank {}: expected 1-3", self.rank)
    }
}

impl std::error::Error for InvalidSeverityRank {}

/// Lifecycle status of an emergency report.
///
/// Reports are created `pending` and only ever change status; they are
/// never deleted.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ReportStatus {
    /// Newly submitted, awaiting a responder.
    Pending,
    /// A responder is working the report.
    InProgress,
    /// The emergency has been handled.
    Resolved,
}

impl ReportStatus {
    /// Returns `true` for statuses that still need responder attention.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::InProgress, Self::Resolved]
    }
}

/// Classifier output: the inferred category and severity for a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Inferred emergency category.
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    /// Inferred severity level.
    pub severity: Severity,
}

/// Structured address components from a geocoding result.
///
/// Field names match the reverse-geocoding provider's component keys;
/// unknown provider keys are ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressComponents {
    /// Neighbourhood-level component, when the provider supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub neighbourhood: Option<String>,
    /// Suburb-level component, often filled instead of `neighbourhood`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suburb: Option<String>,
    /// City name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// District within the state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_district: Option<String>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    /// Country name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl AddressComponents {
    /// The neighbourhood component, falling back to the suburb.
    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        self.neighbourhood.as_deref().or(self.suburb.as_deref())
    }
}

/// Geocoded location attached to a report submitted with device
/// coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetails {
    /// Coordinates the report was submitted from.
    pub coordinates: Coordinate,
    /// Structured components from the geocoding result.
    pub components: AddressComponents,
    /// Geocoding confidence, 0-10.
    pub confidence: u8,
}

/// A persisted emergency report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyRecord {
    /// Unique report id.
    pub id: String,
    /// Free-text location, either typed or prefilled from detection.
    pub location: String,
    /// The reporter's description of the emergency.
    pub description: String,
    /// Id of the submitting user, if signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Display name of the reporter.
    pub user_name: String,
    /// Classified severity.
    pub severity: Severity,
    /// Classified category.
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    /// Lifecycle status.
    pub status: ReportStatus,
    /// Whether the location came from device detection rather than typing.
    pub auto_detected_location: bool,
    /// Geocoded location, present when coordinates were available at
    /// submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_details: Option<LocationDetails>,
    /// Server-assigned creation time.
    pub created_at: DateTime<Utc>,
    /// Bumped on every status change.
    pub updated_at: DateTime<Utc>,
}

/// A report draft before the store assigns its id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEmergency {
    /// Free-text location.
    pub location: String,
    /// The reporter's description.
    pub description: String,
    /// Id of the submitting user, if signed in.
    pub user_id: Option<String>,
    /// Display name of the reporter.
    pub user_name: String,
    /// Classified severity.
    pub severity: Severity,
    /// Classified category.
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    /// Initial lifecycle status.
    pub status: ReportStatus,
    /// Whether the location came from device detection.
    pub auto_detected_location: bool,
    /// Geocoded location, when coordinates were available.
    pub location_details: Option<LocationDetails>,
}

/// A lightweight entry in a user's report history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportHistoryEntry {
    /// Id of the submitted report.
    pub report_id: String,
    /// Truncated description for list display.
    pub summary: String,
    /// Free-text location of the report.
    pub location: String,
    /// Submission date.
    pub date: NaiveDate,
}

/// A user profile with accumulated report history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique user id.
    pub user_id: String,
    /// Display name.
    pub name: String,
    /// Contact phone number, if provided.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// History of submitted reports, newest appended last.
    #[serde(default)]
    pub report_history: Vec<ReportHistoryEntry>,
}
