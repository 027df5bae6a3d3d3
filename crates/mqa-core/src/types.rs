use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the five quality facets a metric contributes to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Findability,
    Accessibility,
    Interoperability,
    Reusability,
    Contextuality,
}

impl Dimension {
    /// All dimensions in reporting order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Findability,
        Dimension::Accessibility,
        Dimension::Interoperability,
        Dimension::Reusability,
        Dimension::Contextuality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Findability => "findability",
            Dimension::Accessibility => "accessibility",
            Dimension::Interoperability => "interoperability",
            Dimension::Reusability => "reusability",
            Dimension::Contextuality => "contextuality",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative rating derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Rating {
    Excellent,
    Good,
    Sufficient,
    Bad,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Sufficient => "Sufficient",
            Rating::Bad => "Bad",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape validation depth for profiles that publish layered shape sets.
///
/// Level 1 covers the base shapes, level 2 adds controlled vocabularies and
/// level 3 adds recommended properties.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    Level1,
    #[default]
    Level2,
    Level3,
}

impl ComplianceLevel {
    pub fn from_number(level: u8) -> Option<Self> {
        match level {
            1 => Some(ComplianceLevel::Level1),
            2 => Some(ComplianceLevel::Level2),
            3 => Some(ComplianceLevel::Level3),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            ComplianceLevel::Level1 => 1,
            ComplianceLevel::Level2 => 2,
            ComplianceLevel::Level3 => 3,
        }
    }
}
