//! Planner use-case service.
//!
//! # Responsibility
//! - Load a task snapshot from a [`TaskSource`] and keep it for queries.
//! - Expose scoring, basin views, B5 slots and day plans over that snapshot.
//!
//! # Invariants
//! - Queries never reload; only `refresh` replaces the snapshot.
//! - A failed refresh keeps the previous snapshot.

use crate::basin::classified::{basin_view_rows, classify_tasks, DecisionRow};
use crate::basin::slots::{group_b5_slots, B5Slot};
use crate::config::PlannerSettings;
use crate::graph::task_index::TaskIndex;
use crate::model::basin::Basin;
use crate::model::task::TaskRecord;
use crate::schedule::planner::{plan_day, DaySchedule};
use crate::scoring::engine::{ScoredTask, ScoringEngine};
use crate::scoring::lexicon::TagLexicon;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Provider of the host's task records.
pub trait TaskSource {
    fn load_tasks(&self) -> Result<Vec<TaskRecord>, TaskSourceError>;
}

impl TaskSource for Vec<TaskRecord> {
    fn load_tasks(&self) -> Result<Vec<TaskRecord>, TaskSourceError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSourceError {
    /// The backing store could not be read.
    Unavailable(String),
    /// The store was read but its content is not a task list.
    InvalidData(String),
}

impl Display for TaskSourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "task source unavailable: {message}"),
            Self::InvalidData(message) => write!(f, "invalid task data: {message}"),
        }
    }
}

impl Error for TaskSourceError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerServiceError {
    Source(TaskSourceError),
    /// A query ran before the first successful `refresh`.
    NotLoaded,
}

impl Display for PlannerServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::NotLoaded => write!(f, "no task snapshot loaded; call refresh first"),
        }
    }
}

impl Error for PlannerServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::NotLoaded => None,
        }
    }
}

impl From<TaskSourceError> for PlannerServiceError {
    fn from(value: TaskSourceError) -> Self {
        Self::Source(value)
    }
}

pub type PlannerResult<T> = Result<T, PlannerServiceError>;

/// Facade over the scoring, basin and schedule engines.
pub struct PlannerService<S: TaskSource, L: TagLexicon> {
    source: S,
    lexicon: L,
    settings: PlannerSettings,
    snapshot: Option<TaskIndex>,
}

impl<S: TaskSource, L: TagLexicon> PlannerService<S, L> {
    pub fn new(source: S, lexicon: L, settings: PlannerSettings) -> Self {
        Self {
            source,
            lexicon,
            settings,
            snapshot: None,
        }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Reloads tasks from the source and rebuilds the index.
    ///
    /// Returns the number of indexed tasks.
    pub fn refresh(&mut self) -> PlannerResult<usize> {
        let records = match self.source.load_tasks() {
            Ok(records) => records,
            Err(err) => {
                warn!("event=snapshot_refresh module=service status=error reason=source");
                return Err(err.into());
            }
        };
        let index = TaskIndex::build(records);
        info!(
            "event=snapshot_refresh module=service status=ok tasks={} diagnostics={}",
            index.len(),
            index.diagnostics().len()
        );
        let count = index.len();
        self.snapshot = Some(index);
        Ok(count)
    }

    pub fn snapshot(&self) -> PlannerResult<&TaskIndex> {
        self.snapshot.as_ref().ok_or(PlannerServiceError::NotLoaded)
    }

    /// All tasks, best score first.
    pub fn scored_tasks(&self, today: NaiveDate) -> PlannerResult<Vec<ScoredTask>> {
        let index = self.snapshot()?;
        Ok(ScoringEngine::new(&self.lexicon).score_all(index, today))
    }

    pub fn basin_rows(&self, view: Basin, today: NaiveDate) -> PlannerResult<Vec<DecisionRow>> {
        let index = self.snapshot()?;
        let classified = classify_tasks(index, &self.lexicon, &self.settings.basin, today);
        Ok(basin_view_rows(&classified, view))
    }

    pub fn b5_slots(&self, today: NaiveDate) -> PlannerResult<Vec<B5Slot>> {
        let index = self.snapshot()?;
        let classified = classify_tasks(index, &self.lexicon, &self.settings.basin, today);
        Ok(group_b5_slots(&classified, &self.settings.slots))
    }

    pub fn plan_day(&self, now: NaiveDateTime) -> PlannerResult<DaySchedule> {
        let index = self.snapshot()?;
        Ok(plan_day(index, &self.lexicon, &self.settings, now))
    }
}

#[cfg(test)]
mod tests {
    use super::{PlannerService, PlannerServiceError, TaskSource, TaskSourceError};
    use crate::config::PlannerSettings;
    use crate::model::task::TaskRecord;
    use crate::scoring::lexicon::StaticTagLexicon;
    use chrono::NaiveDate;

    struct BrokenSource;

    impl TaskSource for BrokenSource {
        fn load_tasks(&self) -> Result<Vec<TaskRecord>, TaskSourceError> {
            Err(TaskSourceError::Unavailable("vault locked".to_string()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn queries_before_refresh_are_rejected() {
        let service = PlannerService::new(
            vec![TaskRecord::new("a", "a")],
            StaticTagLexicon::new(),
            PlannerSettings::default(),
        );
        assert_eq!(service.scored_tasks(today()), Err(PlannerServiceError::NotLoaded));
    }

    #[test]
    fn refresh_indexes_source_records() {
        let mut service = PlannerService::new(
            vec![TaskRecord::new("a", "a"), TaskRecord::new("b", "b")],
            StaticTagLexicon::new(),
            PlannerSettings::default(),
        );
        assert_eq!(service.refresh(), Ok(2));
        assert_eq!(service.scored_tasks(today()).unwrap().len(), 2);
    }

    #[test]
    fn source_failure_surfaces_as_service_error() {
        let mut service =
            PlannerService::new(BrokenSource, StaticTagLexicon::new(), PlannerSettings::default());
        let err = service.refresh().expect_err("broken source must fail");
        assert!(matches!(err, PlannerServiceError::Source(_)));
        assert!(err.to_string().contains("vault locked"));
    }
}
