//! Aggregate statistics over the report list for the dashboard.

use std::collections::BTreeMap;

use saarthi_emergency_models::{EmergencyRecord, EmergencyType, ReportStatus};
use serde::{Deserialize, Serialize};

/// Reports sharing one category, with their count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    /// Emergency category.
    #[serde(rename = "type")]
    pub emergency_type: EmergencyType,
    /// Number of reports in the category.
    pub count: usize,
}

/// Reports sharing one coarse location, with their count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCount {
    /// First comma-separated token of the reports' location text.
    pub location: String,
    /// Number of reports at the location.
    pub count: usize,
}

/// Dashboard summary over the full report list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Total number of reports.
    pub total: usize,
    /// Reports still needing attention (pending or in progress).
    pub active: usize,
    /// Reports already handled.
    pub resolved: usize,
    /// Per-category counts, largest first.
    pub by_type: Vec<TypeCount>,
    /// Per-location counts, largest first.
    pub by_location: Vec<LocationCount>,
}

/// Summarizes the report list.
///
/// Locations are grouped by the first comma-separated token of their
/// free text ("Saket, Delhi" and "Saket, New Delhi" both count under
/// "Saket"); blank locations group under "Unknown". Count ties keep the
/// grouping key order, so the output is deterministic.
#[must_use]
pub fn summarize(records: &[EmergencyRecord]) -> ReportSummary {
    let total = records.len();
    let active = records
        .iter()
        .filter(|record| record.status.is_active())
        .count();
    let resolved = records
        .iter()
        .filter(|record| record.status == ReportStatus::Resolved)
        .count();

    let mut type_counts: BTreeMap<EmergencyType, usize> = BTreeMap::new();
    let mut location_counts: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *type_counts.entry(record.emergency_type).or_insert(0) += 1;
        *location_counts
            .entry(coarse_location(&record.location))
            .or_insert(0) += 1;
    }

    let mut by_type: Vec<TypeCount> = type_counts
        .into_iter()
        .map(|(emergency_type, count)| TypeCount {
            emergency_type,
            count,
        })
        .collect();
    by_type.sort_by(|a, b| b.count.cmp(&a.count));

    let mut by_location: Vec<LocationCount> = location_counts
        .into_iter()
        .map(|(location, count)| LocationCount { location, count })
        .collect();
    by_location.sort_by(|a, b| b.count.cmp(&a.count));

    ReportSummary {
        total,
        active,
        resolved,
        by_type,
        by_location,
    }
}

fn coarse_location(location: &str) -> String {
    let first = location.split(',').next().unwrap_or("").trim();
    if first.is_empty() {
        "Unknown".to_string()
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use saarthi_emergency_models::Severity;

    use super::*;

    fn record(location: &str, emergency_type: EmergencyType, status: ReportStatus) -> EmergencyRecord {
        EmergencyRecord {
            id: format!("r{location}"),
            location: location.to_string(),
            description: "Something is happening here".to_string(),
            user_id: None,
            user_name: "Asha".to_string(),
            severity: Severity::Medium,
            emergency_type,
            status,
            auto_detected_location: false,
            location_details: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_list_summarizes_to_zeroes() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.active, 0);
        assert_eq!(summary.resolved, 0);
        assert!(summary.by_type.is_empty());
        assert!(summary.by_location.is_empty());
    }

    #[test]
    fn active_counts_pending_and_in_progress() {
        let records = vec![
            record("A", EmergencyType::Fire, ReportStatus::Pending),
            record("B", EmergencyType::Fire, ReportStatus::InProgress),
            record("C", EmergencyType::Fire, ReportStatus::Resolved),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.resolved, 1);
    }

    #[test]
    fn type_counts_sort_largest_first() {
        let records = vec![
            record("A", EmergencyType::Flood, ReportStatus::Pending),
            record("B", EmergencyType::Flood, ReportStatus::Pending),
            record("C", EmergencyType::Flood, ReportStatus::Pending),
            record("D", EmergencyType::Fire, ReportStatus::Pending),
            record("E", EmergencyType::Fire, ReportStatus::Pending),
            record("F", EmergencyType::Crime, ReportStatus::Pending),
        ];

        let summary = summarize(&records);
        let counts: Vec<(EmergencyType, usize)> = summary
            .by_type
            .iter()
            .map(|entry| (entry.emergency_type, entry.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                (EmergencyType::Flood, 3),
                (EmergencyType::Fire, 2),
                (EmergencyType::Crime, 1),
            ]
        );
    }

    #[test]
    fn locations_group_by_first_comma_token() {
        let records = vec![
            record("Saket, Delhi", EmergencyType::Fire, ReportStatus::Pending),
            record("Saket, New Delhi", EmergencyType::Fire, ReportStatus::Pending),
            record("Rohini, Delhi", EmergencyType::Fire, ReportStatus::Pending),
            record("   ", EmergencyType::Fire, ReportStatus::Pending),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.by_location[0].location, "Saket");
        assert_eq!(summary.by_location[0].count, 2);

        let labels: Vec<&str> = summary
            .by_location
            .iter()
            .map(|entry| entry.location.as_str())
            .collect();
        assert!(labels.contains(&"Rohini"));
        assert!(labels.contains(&"Unknown"));
    }

    #[test]
    fn summary_serializes_camel_case() {
        let records = vec![record("Saket, Delhi", EmergencyType::Fire, ReportStatus::Pending)];
        let value = serde_json::to_value(summarize(&records)).unwrap();

        assert_eq!(value["total"], serde_json::json!(1));
        assert_eq!(value["byType"][0]["type"], serde_json::json!("fire"));
        assert_eq!(value["byType"][0]["count"], serde_json::json!(1));
        assert_eq!(
            value["byLocation"][0]["location"],
            serde_json::json!("Saket")
        );
    }
}
