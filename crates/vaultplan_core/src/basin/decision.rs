//! Intake inference and next-operator decision table.
//!
//! # Invariants
//! - Intake inference only ever yields B1, B2 or B3.
//! - The decision table is evaluated top to bottom; the first rule wins.
//! - Prerequisite presence, not resolution, counts as blocked.

use crate::basin::flags::TaskFlags;
use crate::basin::settings::BasinSettings;
use crate::model::basin::{Basin, NextOperator};
use serde::{Deserialize, Serialize};

/// Rule that produced a next-operator suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    AuthorityReady,
    AuthorityNeedsWorkshop,
    HasChildren,
    EligibleForCommit,
    MissingDuration,
    BlockedByPrerequisites,
    StructureSmell,
    NothingToChange,
}

/// Suggested operator with the rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperatorDecision {
    pub operator: NextOperator,
    pub reason: DecisionReason,
}

impl OperatorDecision {
    fn new(operator: NextOperator, reason: DecisionReason) -> Self {
        Self { operator, reason }
    }
}

/// Technical B5 predicate, independent of tags.
pub fn is_eligible_b5(flags: &TaskFlags) -> bool {
    flags.is_leaf && flags.has_duration && !flags.is_blocked_by_prereqs
}

/// B0 routing for untagged tasks.
pub fn infer_intake_basin(flags: &TaskFlags, settings: &BasinSettings) -> Basin {
    if flags.is_authority {
        return Basin::B3;
    }
    let short = flags
        .duration_minutes
        .map(|minutes| minutes <= settings.short_task_minutes)
        .unwrap_or(false);
    if flags.is_leaf
        && flags.has_duration
        && !flags.is_blocked_by_prereqs
        && short
        && !flags.structure_smell
    {
        return Basin::B1;
    }
    Basin::B2
}

/// Next operator for a task whose current basin is a triage lane.
pub fn decide_next_operator(flags: &TaskFlags) -> Option<OperatorDecision> {
    if !flags.current_basin.is_triage() {
        return None;
    }

    let eligible = is_eligible_b5(flags);
    let decision = if flags.current_basin == Basin::B3 {
        if eligible {
            OperatorDecision::new(NextOperator::ToB5, DecisionReason::AuthorityReady)
        } else {
            OperatorDecision::new(NextOperator::ToB4, DecisionReason::AuthorityNeedsWorkshop)
        }
    } else if !flags.is_leaf && flags.children_count > 0 {
        OperatorDecision::new(NextOperator::ToB6, DecisionReason::HasChildren)
    } else if eligible {
        OperatorDecision::new(NextOperator::ToB5, DecisionReason::EligibleForCommit)
    } else if flags.is_leaf && !flags.has_duration {
        OperatorDecision::new(NextOperator::ToB4, DecisionReason::MissingDuration)
    } else if flags.is_blocked_by_prereqs {
        OperatorDecision::new(NextOperator::ToB4, DecisionReason::BlockedByPrerequisites)
    } else if flags.structure_smell {
        OperatorDecision::new(NextOperator::ToB4, DecisionReason::StructureSmell)
    } else {
        OperatorDecision::new(NextOperator::Stay, DecisionReason::NothingToChange)
    };
    Some(decision)
}

/// Whether a task shows up when browsing `view`.
pub fn appears_in_view(flags: &TaskFlags, view: Basin) -> bool {
    if let Some(tagged) = flags.tagged_basin {
        return tagged == view;
    }
    match view {
        Basin::B0 => true,
        Basin::B1 | Basin::B2 | Basin::B3 => flags.current_basin == view,
        Basin::B4 | Basin::B5 | Basin::B6 => {
            flags.current_basin.is_triage()
                && flags.next_operator.is_some()
                && flags.next_operator == view.inbound_operator()
        }
    }
}
