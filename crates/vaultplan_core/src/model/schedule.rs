//! Day-schedule value types.
//!
//! # Responsibility
//! - Describe fixed intervals, free slots and time blocks for one day.
//! - Keep block kinds a closed set with a single `Other` escape hatch.
//!
//! # Invariants
//! - Every interval satisfies `start <= end`.
//! - `minutes` always equals the whole minutes between `start` and `end`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Whole minutes from `start` to `end` (negative when reversed).
pub fn minutes_between(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}

/// Origin of an immovable interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixedKind {
    Meal,
    Rendezvous,
    Logistics,
}

/// Sub-interval synthesized around a rendezvous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogisticsRole {
    Prep,
    TravelBefore,
    TravelAfter,
    Recover,
}

impl LogisticsRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Prep => "prep",
            Self::TravelBefore => "travel_before",
            Self::TravelAfter => "travel_after",
            Self::Recover => "recover",
        }
    }
}

/// Immovable interval on the day timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedEvent {
    pub kind: FixedKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub label: String,
    /// Shared by a rendezvous and its logistics intervals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<LogisticsRole>,
}

impl FixedEvent {
    pub fn minutes(&self) -> i64 {
        minutes_between(self.start, self.end)
    }
}

/// Maximal uncovered interval inside the day horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub minutes: u32,
}

impl FreeSlot {
    /// Returns `None` for empty or reversed intervals.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        let minutes = minutes_between(start, end);
        if minutes <= 0 {
            return None;
        }
        Some(Self {
            start,
            end,
            minutes: u32::try_from(minutes).unwrap_or(u32::MAX),
        })
    }
}

/// Attention style of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttentionProfile {
    Deep,
    Shallow,
    Admin,
}

impl AttentionProfile {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deep => "deep",
            Self::Shallow => "shallow",
            Self::Admin => "admin",
        }
    }
}

/// Purpose of a time block.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    /// Daily governance review; gates every other block.
    GovernanceR0,
    /// Deciding what gets committed to B5.
    GovernanceCommit,
    Execute,
    Workshop,
    Close,
    Admin,
    /// Slack time, never filled.
    Buffer,
    Other(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::GovernanceR0 => "governance:r0",
            Self::GovernanceCommit => "governance:commit",
            Self::Execute => "execute",
            Self::Workshop => "workshop",
            Self::Close => "close",
            Self::Admin => "admin",
            Self::Buffer => "buffer",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn is_governance(&self) -> bool {
        matches!(self, Self::GovernanceR0 | Self::GovernanceCommit)
    }
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "governance:r0" => Self::GovernanceR0,
            "governance:commit" => Self::GovernanceCommit,
            "execute" => Self::Execute,
            "workshop" => Self::Workshop,
            "close" => Self::Close,
            "admin" => Self::Admin,
            "buffer" => Self::Buffer,
            _ => Self::Other(value),
        }
    }
}

impl From<BlockKind> for String {
    fn from(value: BlockKind) -> Self {
        value.as_str().to_string()
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bounded interval with an attention profile and admission gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBlockPlan {
    pub kind: BlockKind,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub minutes: u32,
    pub profile: AttentionProfile,
    /// Recipe that produced the block (`r0` for the governance gate).
    pub recipe_id: String,
    /// Declared recipe priority; lower sorts first on equal start.
    pub priority: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_urgency: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_authority: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tasks: Option<u32>,
}

/// Task placed inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub task_id: String,
    pub title: String,
    /// Index into `DaySchedule::blocks`.
    pub block_index: usize,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub minutes: u32,
    pub score: f64,
}

/// One renderable row of the compiled day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScheduleItem {
    Block(TimeBlockPlan),
    Task(ScheduledTask),
}

#[cfg(test)]
mod tests {
    use super::{BlockKind, FreeSlot};
    use chrono::NaiveDate;

    #[test]
    fn block_kind_round_trips_known_and_unknown_names() {
        assert_eq!(BlockKind::from("governance:r0".to_string()), BlockKind::GovernanceR0);
        assert_eq!(BlockKind::from(" Execute ".to_string()), BlockKind::Execute);
        let other = BlockKind::from("reading".to_string());
        assert_eq!(other, BlockKind::Other("reading".to_string()));
        assert_eq!(String::from(other), "reading");
        assert!(BlockKind::GovernanceCommit.is_governance());
        assert!(!BlockKind::Close.is_governance());
    }

    #[test]
    fn free_slot_rejects_empty_intervals() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let a = day.and_hms_opt(9, 0, 0).unwrap();
        let b = day.and_hms_opt(9, 45, 0).unwrap();
        assert!(FreeSlot::new(a, a).is_none());
        assert!(FreeSlot::new(b, a).is_none());
        assert_eq!(FreeSlot::new(a, b).unwrap().minutes, 45);
    }
}
