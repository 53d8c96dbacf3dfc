//! Keyword tables backing the emergency classifier.
//!
//! Groups are scanned in declaration order and matching is lower-case
//! substring containment, so multi-word phrases must appear exactly as
//! reporters tend to type them.

use saarthi_emergency_models::EmergencyType;

/// Ordered category keyword groups. The first group with any matching
/// keyword decides the emergency type.
pub(crate) const TYPE_GROUPS: &[(EmergencyType, &[&str])] = &[
    (
        EmergencyType::Fire,
        &["fire", "burning", "smoke", "flames", "blaze"],
    ),
    (
        EmergencyType::Flood,
        &[
            "flood",
            "waterlogging",
            "water logging",
            "drowning",
            "submerged",
            "overflow",
        ],
    ),
    (
        EmergencyType::Accident,
        &[
            "accident",
            "crash",
            "collision",
            "hit and run",
            "run over",
            "vehicle",
        ],
    ),
    (
        EmergencyType::Medical,
        &[
            "medical",
            "injury",
            "injured",
            "unwell",
            "pain",
            "heart",
            "breathing",
            "blood",
            "bleeding",
            "ambulance",
            "unconscious",
            "fracture",
            "poison",
        ],
    ),
    (
        EmergencyType::Crime,
        &[
            "crime",
            "theft",
            "robbery",
            "assault",
            "attack",
            "stolen",
            "kidnap",
            "violence",
            "gunshot",
            "fight",
        ],
    ),
    (
        EmergencyType::Structural,
        &[
            "building",
            "collapse",
            "structure",
            "wall",
            "bridge",
            "crack",
            "debris",
        ],
    ),
];

/// Phrases that force high severity; scanned before the low list.
pub(crate) const HIGH_SEVERITY_PHRASES: &[&str] = &[
    "severe",
    "critical",
    "urgent",
    "not breathing",
    "unconscious",
    "heart attack",
    "stroke",
    "bleeding heavily",
    "heavy bleeding",
    "trapped",
    "explosion",
    "collapsed",
    "multiple people",
    "life threatening",
    "dying",
    "spreading fast",
];

/// Phrases that mark low severity when no high phrase matched.
pub(crate) const LOW_SEVERITY_PHRASES: &[&str] = &[
    "minor",
    "small",
    "stable",
    "controlled",
    "no injuries",
    "resolved",
    "recovering",
    "under control",
    "slight",
];

/// Fire reports escalate to high severity on any of these.
pub(crate) const FIRE_ESCALATION: &[&str] = &["spreading", "big", "large"];

/// Medical reports escalate to high severity on any of these.
pub(crate) const MEDICAL_ESCALATION: &[&str] = &["child", "baby", "pregnant"];
