//! Core planning logic for vaultplan.
//! Scores vault tasks, classifies them into basins and compiles day schedules.

pub mod basin;
pub mod config;
pub mod graph;
pub mod logging;
pub mod model;
pub mod schedule;
pub mod scoring;
pub mod service;

pub use basin::classified::{basin_view_rows, classify_tasks, ClassifiedTask, DecisionRow};
pub use basin::flags::{derive_flags, TaskFlags};
pub use basin::slots::{group_b5_slots, B5Slot, SlotMode, SlotRule, SlotSettings};
pub use config::day_profiles::DayProfileSettings;
pub use config::schedule_options::ScheduleOptions;
pub use config::PlannerSettings;
pub use graph::relation_graph::{Direction, RelationGraph, RelationKind};
pub use graph::task_index::TaskIndex;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::basin::{Basin, NextOperator};
pub use model::dimensions::Dimensions;
pub use model::schedule::{
    AttentionProfile, BlockKind, FixedEvent, FixedKind, FreeSlot, ScheduleItem, ScheduledTask,
    TimeBlockPlan,
};
pub use model::task::{ScheduledAt, ScheduledAtParseError, TaskDates, TaskId, TaskRecord};
pub use schedule::planner::{plan_day, DaySchedule};
pub use scoring::engine::{ScoredTask, ScoringEngine};
pub use scoring::lexicon::{StaticTagLexicon, TagLexicon};
pub use service::plan_service::{
    PlannerResult, PlannerService, PlannerServiceError, TaskSource, TaskSourceError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
