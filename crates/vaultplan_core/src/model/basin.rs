//! Workflow basin enumeration.
//!
//! # Invariants
//! - The set of basins is closed (`B0..B6`).
//! - Only triage basins (`B1..B3`) receive a next-operator suggestion.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Workflow stage a task occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Basin {
    /// Intake.
    B0,
    /// Quick-win triage lane.
    B1,
    /// Default candidate pool.
    B2,
    /// Authority/closure lane.
    B3,
    /// Workshop: needs shaping before it can run.
    B4,
    /// Commit/execute.
    B5,
    /// Embargo: parked.
    B6,
}

impl Basin {
    pub const ALL: [Basin; 7] = [
        Basin::B0,
        Basin::B1,
        Basin::B2,
        Basin::B3,
        Basin::B4,
        Basin::B5,
        Basin::B6,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::B0 => "B0",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::B3 => "B3",
            Self::B4 => "B4",
            Self::B5 => "B5",
            Self::B6 => "B6",
        }
    }

    /// Parses `B0..B6`, case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|basin| basin.as_str() == normalized)
    }

    pub fn is_triage(self) -> bool {
        matches!(self, Self::B1 | Self::B2 | Self::B3)
    }

    /// Operator whose outcome lands a task in this basin view.
    pub fn inbound_operator(self) -> Option<NextOperator> {
        match self {
            Self::B4 => Some(NextOperator::ToB4),
            Self::B5 => Some(NextOperator::ToB5),
            Self::B6 => Some(NextOperator::ToB6),
            _ => None,
        }
    }
}

impl Display for Basin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested transition for a task sitting in a triage basin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NextOperator {
    #[serde(rename = "B4")]
    ToB4,
    #[serde(rename = "B5")]
    ToB5,
    #[serde(rename = "B6")]
    ToB6,
    #[serde(rename = "stay")]
    Stay,
}

impl NextOperator {
    pub fn target(self) -> Option<Basin> {
        match self {
            Self::ToB4 => Some(Basin::B4),
            Self::ToB5 => Some(Basin::B5),
            Self::ToB6 => Some(Basin::B6),
            Self::Stay => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Basin, NextOperator};

    #[test]
    fn parses_basin_names() {
        assert_eq!(Basin::parse("b5"), Some(Basin::B5));
        assert_eq!(Basin::parse(" B0 "), Some(Basin::B0));
        assert_eq!(Basin::parse("B7"), None);
    }

    #[test]
    fn inbound_operator_exists_only_for_outcome_basins() {
        for basin in Basin::ALL {
            let op = basin.inbound_operator();
            match basin {
                Basin::B4 | Basin::B5 | Basin::B6 => {
                    assert_eq!(op.and_then(NextOperator::target), Some(basin))
                }
                _ => assert!(op.is_none()),
            }
        }
    }

    #[test]
    fn operator_serializes_as_basin_name() {
        assert_eq!(serde_json::to_string(&NextOperator::ToB5).unwrap(), "\"B5\"");
        assert_eq!(serde_json::to_string(&NextOperator::Stay).unwrap(), "\"stay\"");
    }
}
