//! Classified task rows and basin view tables.
//!
//! # Responsibility
//! - Pair each scored task with its flags and operator decision.
//! - Build the rows shown for one basin view.
//!
//! # Invariants
//! - Classified tasks come out best score first, ties by id.
//! - View rows keep that order.

use crate::basin::decision::{appears_in_view, OperatorDecision};
use crate::basin::flags::{derive_flags, TaskFlags};
use crate::basin::settings::BasinSettings;
use crate::graph::task_index::TaskIndex;
use crate::model::basin::Basin;
use crate::model::dimensions::Dimensions;
use crate::model::task::TaskRecord;
use crate::scoring::engine::{by_score_then_id, ScoredTask, ScoringEngine};
use crate::scoring::lexicon::TagLexicon;
use chrono::NaiveDate;
use serde::Serialize;

/// A task with its score and flags for one planning run.
#[derive(Debug, Clone)]
pub struct ClassifiedTask<'a> {
    pub record: &'a TaskRecord,
    pub scored: ScoredTask,
    pub flags: TaskFlags,
}

impl ClassifiedTask<'_> {
    pub fn id(&self) -> &str {
        &self.record.id
    }

    pub fn dimensions(&self) -> Dimensions {
        self.scored.dimensions
    }

    pub fn score(&self) -> f64 {
        self.scored.score
    }
}

/// Scores and classifies every task, best score first.
pub fn classify_tasks<'a, L: TagLexicon + ?Sized>(
    index: &'a TaskIndex,
    lexicon: &L,
    settings: &BasinSettings,
    today: NaiveDate,
) -> Vec<ClassifiedTask<'a>> {
    let engine = ScoringEngine::new(lexicon);
    let mut classified: Vec<ClassifiedTask<'a>> = index
        .tasks()
        .iter()
        .map(|record| ClassifiedTask {
            record,
            scored: engine.score_task(record, index, today),
            flags: derive_flags(record, index, settings),
        })
        .collect();
    classified.sort_by(|a, b| by_score_then_id(a.score(), a.id(), b.score(), b.id()));
    classified
}

/// One row of a basin view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionRow {
    pub id: String,
    pub title: String,
    pub dimensions: Dimensions,
    pub score: f64,
    pub flags: TaskFlags,
    pub decision: Option<OperatorDecision>,
}

/// Rows visible in `view`, in canonical score order.
pub fn basin_view_rows(classified: &[ClassifiedTask<'_>], view: Basin) -> Vec<DecisionRow> {
    classified
        .iter()
        .filter(|task| appears_in_view(&task.flags, view))
        .map(|task| DecisionRow {
            id: task.scored.id.clone(),
            title: task.scored.title.clone(),
            dimensions: task.dimensions(),
            score: task.score(),
            flags: task.flags.clone(),
            decision: task
                .flags
                .next_operator
                .zip(task.flags.decision_reason)
                .map(|(operator, reason)| OperatorDecision { operator, reason }),
        })
        .collect()
}
