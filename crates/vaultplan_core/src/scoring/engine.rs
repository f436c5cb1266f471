//! Dimension scoring engine.
//!
//! # Responsibility
//! - Fold tag dimensions, date pressure and relation friction into one
//!   `Dimensions` value per task.
//! - Rank a task index by score.
//!
//! # Invariants
//! - Dimensions stay within 0..=5 after every stage.
//! - Ranking is score descending, then id ascending, so equal scores have a
//!   stable order.

use crate::graph::task_index::TaskIndex;
use crate::model::dimensions::Dimensions;
use crate::model::task::TaskRecord;
use crate::scoring::lexicon::TagLexicon;
use crate::scoring::time_pressure::time_dimensions;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Dimensions and score for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    pub id: String,
    pub title: String,
    pub dimensions: Dimensions,
    pub score: f64,
}

/// Stage-by-stage view of how a task's dimensions were reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionBreakdown {
    pub from_tags: Dimensions,
    pub from_dates: Dimensions,
    /// Tag and date signals folded together, before relation friction.
    pub folded: Dimensions,
    pub has_parent: bool,
    pub has_children: bool,
    pub final_dimensions: Dimensions,
}

/// Three-stage dimension pipeline: tags, dates, relation friction.
pub struct ScoringEngine<'a, L: TagLexicon + ?Sized> {
    lexicon: &'a L,
}

impl<'a, L: TagLexicon + ?Sized> ScoringEngine<'a, L> {
    pub fn new(lexicon: &'a L) -> Self {
        Self { lexicon }
    }

    /// Runs every stage and keeps the intermediate triples.
    pub fn breakdown(
        &self,
        task: &TaskRecord,
        index: &TaskIndex,
        today: NaiveDate,
    ) -> DimensionBreakdown {
        let from_tags = Dimensions::fold(
            task.tags
                .iter()
                .filter_map(|tag| self.lexicon.dimensions_for_tag(tag)),
        );
        let from_dates = time_dimensions(&task.dates, today);
        let folded = from_tags.merge_max(from_dates);

        let has_parent = index.parent_count(&task.id) > 0;
        let has_children = index.child_count(&task.id) > 0;
        let mut final_dimensions = folded;
        if has_parent {
            final_dimensions = final_dimensions.adjust_friction(-1);
        }
        if has_children {
            final_dimensions = final_dimensions.adjust_friction(1);
        }

        DimensionBreakdown {
            from_tags,
            from_dates,
            folded,
            has_parent,
            has_children,
            final_dimensions,
        }
    }

    pub fn dimensions(&self, task: &TaskRecord, index: &TaskIndex, today: NaiveDate) -> Dimensions {
        self.breakdown(task, index, today).final_dimensions
    }

    pub fn score_task(&self, task: &TaskRecord, index: &TaskIndex, today: NaiveDate) -> ScoredTask {
        let dimensions = self.dimensions(task, index, today);
        ScoredTask {
            id: task.id.clone(),
            title: task.title(),
            dimensions,
            score: dimensions.score(),
        }
    }

    /// Scores every indexed task, best first.
    pub fn score_all(&self, index: &TaskIndex, today: NaiveDate) -> Vec<ScoredTask> {
        let mut scored: Vec<ScoredTask> = index
            .tasks()
            .iter()
            .map(|task| self.score_task(task, index, today))
            .collect();
        scored.sort_by(|a, b| by_score_then_id(a.score, &a.id, b.score, &b.id));
        scored
    }
}

/// Canonical list order: score descending, then id ascending.
pub fn by_score_then_id(a_score: f64, a_id: &str, b_score: f64, b_id: &str) -> Ordering {
    b_score.total_cmp(&a_score).then_with(|| a_id.cmp(b_id))
}
