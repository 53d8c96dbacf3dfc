#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Keyword-driven emergency classification.
//!
//! Maps a reporter's free-text description to a canonical
//! [`EmergencyType`] and [`Severity`]. Matching is case-insensitive
//! substring containment over ordered keyword groups, with contextual
//! escalation rules for fire and medical reports.

mod keywords;

use saarthi_emergency_models::{Classification, EmergencyType, Severity};

use crate::keywords::{
    FIRE_ESCALATION, HIGH_SEVERITY_PHRASES, LOW_SEVERITY_PHRASES, MEDICAL_ESCALATION, TYPE_GROUPS,
};

/// Classifies a free-text emergency description.
///
/// Always produces a result: an empty or unrecognized description falls
/// back to [`EmergencyType::General`] with [`Severity::Medium`].
#[must_use]
pub fn classify(description: &str) -> Classification {
    let lower = description.to_lowercase();
    let emergency_type = infer_type(&lower);
    let severity = infer_severity(&lower, emergency_type);
    Classification {
        emergency_type,
        severity,
    }
}

/// Picks the first keyword group with a match; `General` when none do.
fn infer_type(lower: &str) -> EmergencyType {
    for (emergency_type, group) in TYPE_GROUPS {
        if contains_any(lower, group) {
            return *emergency_type;
        }
    }
    EmergencyType::General
}

/// Scans the high-severity phrases, then the low-severity phrases, then
/// applies the escalation rules for the inferred type.
fn infer_severity(lower: &str, emergency_type: EmergencyType) -> Severity {
    let base = if contains_any(lower, HIGH_SEVERITY_PHRASES) {
        Severity::High
    } else if contains_any(lower, LOW_SEVERITY_PHRASES) {
        Severity::Low
    } else {
        Severity::Medium
    };

    let escalated = match emergency_type {
        EmergencyType::Fire => contains_any(lower, FIRE_ESCALATION),
        EmergencyType::Medical => contains_any(lower, MEDICAL_ESCALATION),
        _ => false,
    };

    if escalated { Severity::High } else { base }
}

/// Checks if `haystack` contains any of the given `needles`.
fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fire_with_spread_is_high() {
        let result = classify("There is a severe fire spreading near the market");
        assert_eq!(result.emergency_type, EmergencyType::Fire);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn minor_accident_is_low() {
        let result = classify("minor accident, no injuries, controlled");
        assert_eq!(result.emergency_type, EmergencyType::Accident);
        assert_eq!(result.severity, Severity::Low);
    }

    #[test]
    fn empty_description_uses_defaults() {
        let result = classify("");
        assert_eq!(result.emergency_type, EmergencyType::General);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn medical_child_escalates() {
        let result = classify("child has severe breathing difficulty");
        assert_eq!(result.emergency_type, EmergencyType::Medical);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn medical_child_escalates_without_high_phrase() {
        let result = classify("a child is having breathing trouble");
        assert_eq!(result.emergency_type, EmergencyType::Medical);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn fire_escalation_overrides_low_phrase() {
        let result = classify("small fire but it is spreading");
        assert_eq!(result.emergency_type, EmergencyType::Fire);
        assert_eq!(result.severity, Severity::High);
    }

    #[test]
    fn type_groups_match_in_order() {
        assert_eq!(
            classify("waterlogging near the underpass").emergency_type,
            EmergencyType::Flood
        );
        assert_eq!(
            classify("truck crash on the highway").emergency_type,
            EmergencyType::Accident
        );
        assert_eq!(
            classify("chain snatching and theft").emergency_type,
            EmergencyType::Crime
        );
        assert_eq!(
            classify("cracks in the building wall").emergency_type,
            EmergencyType::Structural
        );
    }

    #[test]
    fn unmatched_text_stays_general_medium() {
        let result = classify("something odd happened here");
        assert_eq!(result.emergency_type, EmergencyType::General);
        assert_eq!(result.severity, Severity::Medium);
    }

    #[test]
    fn case_insensitive_matching() {
        let result = classify("SEVERE FIRE IN THE MARKET");
        assert_eq!(result.emergency_type, EmergencyType::Fire);
        assert_eq!(result.severity, Severity::High);
    }
}
