#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the Saarthi server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the record types to allow independent evolution of the API
//! contract.

use saarthi_emergency_models::ReportStatus;
use saarthi_geo::Coordinate;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// Body of `POST /api/reports`.
///
/// Every field is optional on the wire. A missing location or description
/// deserializes to the empty string so the submission pipeline can answer
/// with its field-specific validation message instead of a bare
/// deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitReportRequest {
    /// Free-text location.
    pub location: String,
    /// Free-text description of the emergency.
    pub description: String,
    /// Device coordinates, when the client auto-detected the location.
    pub detected_coords: Option<Coordinate>,
    /// Whether the location text came from auto-detection.
    pub auto_detected: bool,
    /// Id of the signed-in reporter, when known.
    pub user_id: Option<String>,
    /// Display name of the reporter.
    pub user_name: Option<String>,
}

/// Response of `POST /api/reports`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReportResponse {
    /// Id assigned to the new report.
    pub id: String,
}

/// Body of `POST /api/reports/{id}/status`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    /// Status to move the report to.
    pub status: ReportStatus,
}

/// Query parameters for the reports listing endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsQueryParams {
    /// Restrict the listing to one reporter's submissions.
    pub user_id: Option<String>,
}

/// Body of `POST /api/geocode/reverse`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseGeocodeRequest {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_submit_body_fills_defaults() {
        let body = serde_json::json!({
            "location": "Saket, Delhi",
            "description": "Smoke coming from the second floor"
        });

        let request: SubmitReportRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.location, "Saket, Delhi");
        assert!(!request.auto_detected);
        assert!(request.detected_coords.is_none());
        assert!(request.user_id.is_none());
        assert!(request.user_name.is_none());
    }

    #[test]
    fn submit_body_reads_camel_case_fields() {
        let body = serde_json::json!({
            "location": "Detected location",
            "description": "Vehicle pileup on the flyover",
            "detectedCoords": { "lat": 28.6139, "lng": 77.2090 },
            "autoDetected": true,
            "userId": "u-1",
            "userName": "Asha"
        });

        let request: SubmitReportRequest = serde_json::from_value(body).unwrap();
        assert!(request.auto_detected);
        let coords = request.detected_coords.unwrap();
        assert!((coords.lat - 28.6139).abs() < 1e-9);
        assert_eq!(request.user_id.as_deref(), Some("u-1"));
    }

    #[test]
    fn status_body_uses_wire_spelling() {
        let request: StatusUpdateRequest =
            serde_json::from_value(serde_json::json!({ "status": "inProgress" })).unwrap();
        assert_eq!(request.status, ReportStatus::InProgress);
    }
}
