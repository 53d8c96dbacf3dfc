#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report submission orchestration.
//!
//! Ties the pieces together for one submission: validate the form
//! fields, classify the description, resolve detected coordinates to an
//! address, persist the report, and append it to the reporter's history.
//! Validation runs before any network or database work so a bad form
//! costs nothing.

pub mod summary;

use std::sync::LazyLock;

use regex::Regex;
use saarthi_classifier::classify;
use saarthi_emergency_models::{
    EmergencyRecord, LocationDetails, NewEmergency, ReportHistoryEntry, ReportStatus,
};
use saarthi_geo::Coordinate;
use saarthi_geocoder::position::{
    LocationProvider, PositionError, PositionOptions, position_with_timeout,
};
use saarthi_geocoder::resolver::AddressResolver;
use saarthi_store::{RecordStore, StoreError};
use thiserror::Error;

/// Minimum description length, in characters, after trimming.
pub const MIN_DESCRIPTION_CHARS: usize = 10;

/// Report history summaries are cut to this many characters.
const MAX_SUMMARY_CHARS: usize = 60;

/// Reporter name recorded when the submitter has none.
pub const ANONYMOUS_REPORTER: &str = "Anonymous";

static NUMERIC_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s.,+()-]+$").expect("valid regex"));

/// A submission as it arrives from the report form.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportInput {
    /// Free-text location, typed or prefilled from detection.
    pub location: String,
    /// The reporter's description of the emergency.
    pub description: String,
    /// Device coordinates, when location detection succeeded.
    pub detected_coords: Option<Coordinate>,
    /// Whether the location field was filled by detection.
    pub auto_detected: bool,
    /// Id of the submitting user, if signed in.
    pub user_id: Option<String>,
    /// Display name of the submitting user.
    pub user_name: Option<String>,
}

/// Rejected form fields, with reporter-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The location field is empty.
    #[error("Location is required")]
    MissingLocation,

    /// A typed location contains nothing but digits and punctuation.
    #[error("Location must name an area or landmark, not just numbers")]
    NumericLocation,

    /// The description field is empty.
    #[error("Description is required")]
    MissingDescription,

    /// The description is too short to act on.
    #[error("Description must be at least 10 characters")]
    DescriptionTooShort,
}

/// Errors from report submission.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A form field was rejected.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Device location detection failed.
    #[error("Location error: {0}")]
    Location(#[from] PositionError),

    /// Persisting the report failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Checks the form fields without touching the network or the store.
///
/// The numeric-only check applies to typed locations only; a detected
/// location is a formatted address and may legitimately start with a
/// plus code or house number.
///
/// # Errors
///
/// Returns the first failing [`ValidationError`] in field order.
pub fn validate(input: &ReportInput) -> Result<(), ValidationError> {
    let location = input.location.trim();
    if location.is_empty() {
        return Err(ValidationError::MissingLocation);
    }
    if !input.auto_detected && NUMERIC_ONLY_RE.is_match(location) {
        return Err(ValidationError::NumericLocation);
    }

    let description = input.description.trim();
    if description.is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(ValidationError::DescriptionTooShort);
    }

    Ok(())
}

/// Submits a report: validate, classify, geocode, persist, record
/// history. Returns the new report's id.
///
/// The history append is best-effort; its failure is logged and does not
/// fail the submission that already persisted.
///
/// # Errors
///
/// Returns [`ReportError::Validation`] before any I/O when a field is
/// rejected, or [`ReportError::Store`] when persisting fails.
pub async fn submit_report(
    resolver: &AddressResolver,
    store: &dyn RecordStore,
    input: &ReportInput,
) -> Result<String, ReportError> {
    validate(input)?;

    let classification = classify(&input.description);

    let location_details = match input.detected_coords {
        Some(coords) => Some(resolve_details(resolver, coords).await),
        None => None,
    };

    let draft = NewEmergency {
        location: input.location.trim().to_string(),
        description: input.description.trim().to_string(),
        user_id: input.user_id.clone(),
        user_name: input
            .user_name
            .clone()
            .unwrap_or_else(|| ANONYMOUS_REPORTER.to_string()),
        severity: classification.severity,
        emergency_type: classification.emergency_type,
        status: ReportStatus::Pending,
        auto_detected_location: input.auto_detected,
        location_details,
    };

    let record = store.add_emergency(draft).await?;

    if let Some(user_id) = &input.user_id {
        append_history(store, user_id, &record).await;
    }

    Ok(record.id)
}

async fn resolve_details(resolver: &AddressResolver, coords: Coordinate) -> LocationDetails {
    let address = resolver.resolve_address(coords.lat, coords.lng).await;
    LocationDetails {
        coordinates: coords,
        components: address.components,
        confidence: address.confidence,
    }
}

async fn append_history(store: &dyn RecordStore, user_id: &str, record: &EmergencyRecord) {
    let entry = ReportHistoryEntry {
        report_id: record.id.clone(),
        summary: truncate_summary(&record.description),
        location: record.location.clone(),
        date: record.created_at.date_naive(),
    };

    if let Err(e) = store
        .append_report_history(user_id, &record.user_name, entry)
        .await
    {
        log::warn!(
            "Failed to append report {} to user {user_id} history: {e}",
            record.id
        );
    }
}

fn truncate_summary(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.chars().count() <= MAX_SUMMARY_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(MAX_SUMMARY_CHARS).collect();
    format!("{cut}...")
}

/// A detected device location ready to prefill the report form.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLocation {
    /// The device fix.
    pub coords: Coordinate,
    /// Human-readable address for the fix.
    pub formatted_address: String,
}

/// Reads the device position and reverse-geocodes it.
///
/// # Errors
///
/// Returns [`ReportError::Location`] when no position fix can be
/// obtained. Geocoding itself never fails; unresolvable coordinates get
/// a gazetteer or city-level address.
pub async fn detect_location(
    provider: &dyn LocationProvider,
    resolver: &AddressResolver,
) -> Result<DetectedLocation, ReportError> {
    let position = position_with_timeout(provider, PositionOptions::default()).await?;
    let address = resolver
        .resolve_address(position.latitude, position.longitude)
        .await;

    Ok(DetectedLocation {
        coords: Coordinate::new(position.latitude, position.longitude),
        formatted_address: address.formatted_address,
    })
}
