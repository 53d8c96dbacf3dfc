//! Clustering of assigned reports into per-area map alerts.
//!
//! The map shows one marker per area, not one per report. Reports are
//! folded into their area's alert in arrival order: the first report
//! seeds the marker, later ones only bump the count and can escalate
//! the severity to high.

use chrono::{DateTime, Utc};
use saarthi_emergency_models::{EmergencyRecord, EmergencyType, ReportStatus, Severity};
use saarthi_geo::Coordinate;
use serde::{Deserialize, Serialize};

use crate::{AreaAssignment, Precision};

/// One map marker aggregating every report assigned to an area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAlert {
    /// Id of the first report folded into this alert.
    pub id: String,
    /// Marker position: the area's canonical center.
    pub position: Coordinate,
    /// Area name, or the unknown-tier label.
    pub area: String,
    /// Description of the first report.
    pub description: String,
    /// Highest-escalated severity across the folded reports.
    pub severity: Severity,
    /// Category of the first report.
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    /// Status of the first report.
    pub status: ReportStatus,
    /// Number of reports folded into this alert.
    pub count: usize,
    /// Creation time of the first report.
    pub reported_time: DateTime<Utc>,
    /// Reporter name of the first report.
    pub user_name: String,
    /// Precision of the first report's area assignment.
    pub location_precision: Precision,
}

/// Folds records and their area assignments into one alert per area.
///
/// `records` and `assignments` are paired positionally, as produced by
/// [`crate::assign_areas`]. Groups appear in first-encounter order. A
/// group's severity starts at its first record's and is upgraded to
/// [`Severity::High`] as soon as any high-severity record joins; it
/// never moves back down.
#[must_use]
pub fn cluster_by_area(
    records: &[EmergencyRecord],
    assignments: &[AreaAssignment],
) -> Vec<MapAlert> {
    let mut alerts: Vec<MapAlert> = Vec::new();

    for (record, assignment) in records.iter().zip(assignments) {
        if let Some(alert) = alerts.iter_mut().find(|alert| alert.area == assignment.area) {
            alert.count += 1;
            if record.severity == Severity::High && alert.severity != Severity::High {
                alert.severity = Severity::High;
            }
        } else {
            alerts.push(MapAlert {
                id: record.id.clone(),
                position: assignment.center,
                area: assignment.area.clone(),
                description: record.description.clone(),
                severity: record.severity,
                emergency_type: record.emergency_type,
                status: record.status,
                count: 1,
                reported_time: record.created_at,
                user_name: record.user_name.clone(),
                location_precision: assignment.precision,
            });
        }
    }

    alerts
}
