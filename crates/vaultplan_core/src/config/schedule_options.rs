//! Schedule clock and logistics options.
//!
//! # Invariants
//! - Every field has a default, so a partial settings object still loads.

use serde::{Deserialize, Serialize};

/// Day horizon, fixed events and R0 gate settings.
///
/// Clock values are `HH:MM` strings; malformed ones are replaced by the
/// defaults below when the day context is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleOptions {
    pub day_start: String,
    pub day_end: String,
    pub lunch_start: String,
    pub lunch_minutes: u32,
    pub rendezvous_default_minutes: u32,
    pub logistics: LogisticsOptions,
    /// Tag marking the daily review task.
    pub r0_tag: String,
    pub r0_minutes: u32,
    /// Estimate used by the filler for tasks without a duration.
    pub default_task_minutes: u32,
}

pub const DEFAULT_DAY_START: &str = "07:30";
pub const DEFAULT_DAY_END: &str = "23:30";
pub const DEFAULT_LUNCH_START: &str = "12:30";

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            day_start: DEFAULT_DAY_START.to_string(),
            day_end: DEFAULT_DAY_END.to_string(),
            lunch_start: DEFAULT_LUNCH_START.to_string(),
            lunch_minutes: 45,
            rendezvous_default_minutes: 60,
            logistics: LogisticsOptions::default(),
            r0_tag: "#r0".to_string(),
            r0_minutes: 30,
            default_task_minutes: 30,
        }
    }
}

/// Buffers wrapped around every rendezvous, in minutes. Zero disables one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsOptions {
    pub prep_minutes: u32,
    pub travel_before_minutes: u32,
    pub travel_after_minutes: u32,
    pub recover_minutes: u32,
}

impl LogisticsOptions {
    pub fn none() -> Self {
        Self {
            prep_minutes: 0,
            travel_before_minutes: 0,
            travel_after_minutes: 0,
            recover_minutes: 0,
        }
    }
}

impl Default for LogisticsOptions {
    fn default() -> Self {
        Self {
            prep_minutes: 10,
            travel_before_minutes: 30,
            travel_after_minutes: 20,
            recover_minutes: 10,
        }
    }
}
