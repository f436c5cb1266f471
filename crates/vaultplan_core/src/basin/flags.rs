//! Per-task derived facts.
//!
//! Flags are recomputed on every query from the index; nothing is cached
//! across snapshots.

use crate::basin::decision::{
    decide_next_operator, infer_intake_basin, is_eligible_b5, DecisionReason,
};
use crate::basin::settings::BasinSettings;
use crate::graph::task_index::TaskIndex;
use crate::model::basin::{Basin, NextOperator};
use crate::model::task::TaskRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFlags {
    pub is_leaf: bool,
    pub children_count: usize,
    pub prereq_count: usize,
    pub parent_count: usize,
    pub is_blocked_by_prereqs: bool,
    pub has_duration: bool,
    pub duration_minutes: Option<u32>,
    pub structure_smell: bool,
    pub is_authority: bool,
    pub tagged_basin: Option<Basin>,
    pub inferred_basin: Option<Basin>,
    pub current_basin: Basin,
    pub next_operator: Option<NextOperator>,
    pub decision_reason: Option<DecisionReason>,
    pub eligible_b5: bool,
}

/// Derives the full flag set for one task.
pub fn derive_flags(task: &TaskRecord, index: &TaskIndex, settings: &BasinSettings) -> TaskFlags {
    let children_count = index.child_count(&task.id);
    let prereq_count = index.prerequisite_count(&task.id);
    let parent_count = index.parent_count(&task.id);
    let outgoing_links = prereq_count + parent_count;
    let duration_minutes = task.minutes();
    let tagged_basin = settings.tagged_basin(task);

    let mut flags = TaskFlags {
        is_leaf: children_count == 0,
        children_count,
        prereq_count,
        parent_count,
        is_blocked_by_prereqs: prereq_count > 0,
        has_duration: duration_minutes.is_some(),
        duration_minutes,
        structure_smell: parent_count > 1 || outgoing_links >= settings.smell_outgoing_links,
        is_authority: task.is_authority,
        tagged_basin,
        inferred_basin: None,
        current_basin: tagged_basin.unwrap_or(Basin::B0),
        next_operator: None,
        decision_reason: None,
        eligible_b5: false,
    };

    flags.eligible_b5 = is_eligible_b5(&flags);
    if tagged_basin.is_none() {
        let inferred = infer_intake_basin(&flags, settings);
        flags.inferred_basin = Some(inferred);
        flags.current_basin = inferred;
    }
    if let Some(decision) = decide_next_operator(&flags) {
        flags.next_operator = Some(decision.operator);
        flags.decision_reason = Some(decision.reason);
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::derive_flags;
    use crate::basin::decision::DecisionReason;
    use crate::basin::settings::BasinSettings;
    use crate::graph::task_index::TaskIndex;
    use crate::model::basin::{Basin, NextOperator};
    use crate::model::task::TaskRecord;

    #[test]
    fn untagged_short_leaf_lands_in_b1_and_moves_to_b5() {
        let index = TaskIndex::build(vec![TaskRecord::new("t", "t").with_duration(10)]);
        let flags = derive_flags(index.get("t").unwrap(), &index, &BasinSettings::default());
        assert_eq!(flags.inferred_basin, Some(Basin::B1));
        assert_eq!(flags.current_basin, Basin::B1);
        assert!(flags.eligible_b5);
        assert_eq!(flags.next_operator, Some(NextOperator::ToB5));
        assert_eq!(flags.decision_reason, Some(DecisionReason::EligibleForCommit));
    }

    #[test]
    fn tagged_outcome_basin_gets_no_operator() {
        let index = TaskIndex::build(vec![TaskRecord::new("t", "t")
            .with_tags(["#b4"])
            .with_duration(10)]);
        let flags = derive_flags(index.get("t").unwrap(), &index, &BasinSettings::default());
        assert_eq!(flags.tagged_basin, Some(Basin::B4));
        assert_eq!(flags.inferred_basin, None);
        assert_eq!(flags.next_operator, None);
        assert!(flags.eligible_b5);
    }

    #[test]
    fn one_prerequisite_plus_one_parent_is_smelly() {
        let index = TaskIndex::build(vec![
            TaskRecord::new("t", "t").depending_on("p").child_of("c"),
            TaskRecord::new("p", "p"),
            TaskRecord::new("c", "c"),
        ]);
        let flags = derive_flags(index.get("t").unwrap(), &index, &BasinSettings::default());
        assert!(flags.structure_smell);
        assert!(flags.is_blocked_by_prereqs);
        assert_eq!(flags.current_basin, Basin::B2);
        assert_eq!(flags.next_operator, Some(NextOperator::ToB4));
        assert_eq!(flags.decision_reason, Some(DecisionReason::MissingDuration));
    }
}
