//! B5 commit-slot grouping.
//!
//! # Invariants
//! - Candidates are technically eligible tasks not yet tagged B5; committed
//!   tasks are tagged B5. A task is never in both pools.
//! - Each task lands in exactly one slot: the first matching rule, else the
//!   default slot.
//! - Ids inside a slot keep the canonical score order of the input.

use crate::basin::classified::ClassifiedTask;
use crate::model::basin::Basin;
use crate::model::task::normalize_tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Slot id used by [`SlotMode::All`].
pub const ALL_SLOT_ID: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRule {
    pub slot_id: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl SlotRule {
    pub fn new<I, T>(slot_id: impl Into<String>, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            slot_id: slot_id.into(),
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }

    fn matches(&self, task_tags: &[String]) -> bool {
        self.tags.iter().any(|wanted| {
            let wanted = normalize_tag(wanted);
            !wanted.is_empty() && task_tags.iter().any(|tag| normalize_tag(tag) == wanted)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotMode {
    All,
    ByTag {
        #[serde(default)]
        rules: Vec<SlotRule>,
        #[serde(default = "default_slot_id")]
        default_slot_id: String,
    },
}

fn default_slot_id() -> String {
    "other".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlotSettings {
    pub mode: SlotMode,
}

impl Default for SlotSettings {
    fn default() -> Self {
        Self {
            mode: SlotMode::All,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct B5Slot {
    pub slot_id: String,
    pub candidates: Vec<String>,
    pub committed: Vec<String>,
    pub candidate_count: usize,
    pub committed_count: usize,
    pub candidate_minutes: u32,
    pub committed_minutes: u32,
}

impl B5Slot {
    fn empty(slot_id: &str) -> Self {
        Self {
            slot_id: slot_id.to_string(),
            ..Self::default()
        }
    }

    fn push(&mut self, task: &ClassifiedTask<'_>, committed: bool) {
        let minutes = task.flags.duration_minutes.unwrap_or(0);
        if committed {
            self.committed.push(task.id().to_string());
            self.committed_count += 1;
            self.committed_minutes = self.committed_minutes.saturating_add(minutes);
        } else {
            self.candidates.push(task.id().to_string());
            self.candidate_count += 1;
            self.candidate_minutes = self.candidate_minutes.saturating_add(minutes);
        }
    }

    fn absorb(&mut self, other: B5Slot) {
        self.candidates.extend(other.candidates);
        self.committed.extend(other.committed);
        self.candidate_count += other.candidate_count;
        self.committed_count += other.committed_count;
        self.candidate_minutes = self.candidate_minutes.saturating_add(other.candidate_minutes);
        self.committed_minutes = self.committed_minutes.saturating_add(other.committed_minutes);
    }

    pub fn is_empty(&self) -> bool {
        self.candidate_count == 0 && self.committed_count == 0
    }
}

/// Groups B5 candidates and committed tasks into slots.
///
/// `classified` must already be in canonical score order.
pub fn group_b5_slots(classified: &[ClassifiedTask<'_>], settings: &SlotSettings) -> Vec<B5Slot> {
    match &settings.mode {
        SlotMode::All => {
            let mut slot = B5Slot::empty(ALL_SLOT_ID);
            for (task, committed) in b5_members(classified) {
                slot.push(task, committed);
            }
            vec![slot]
        }
        SlotMode::ByTag {
            rules,
            default_slot_id,
        } => group_by_tag(classified, rules, default_slot_id),
    }
}

fn group_by_tag(
    classified: &[ClassifiedTask<'_>],
    rules: &[SlotRule],
    default_slot_id: &str,
) -> Vec<B5Slot> {
    // Rule slots in declaration order; a repeated slot id reuses the first.
    let mut order: Vec<String> = Vec::new();
    let mut slots: BTreeMap<String, B5Slot> = BTreeMap::new();
    for rule in rules {
        if !slots.contains_key(&rule.slot_id) {
            order.push(rule.slot_id.clone());
            slots.insert(rule.slot_id.clone(), B5Slot::empty(&rule.slot_id));
        }
    }
    let mut fallback = B5Slot::empty(default_slot_id);

    for (task, committed) in b5_members(classified) {
        let slot = rules
            .iter()
            .find(|rule| rule.matches(&task.record.tags))
            .and_then(|rule| slots.get_mut(&rule.slot_id));
        match slot {
            Some(slot) => slot.push(task, committed),
            None => fallback.push(task, committed),
        }
    }

    let mut grouped: Vec<B5Slot> = order
        .iter()
        .filter_map(|slot_id| slots.remove(slot_id))
        .collect();
    if !fallback.is_empty() {
        match grouped
            .iter_mut()
            .find(|slot| slot.slot_id == fallback.slot_id)
        {
            Some(existing) => existing.absorb(fallback),
            None => grouped.push(fallback),
        }
    }
    grouped
}

fn b5_members<'c, 'a>(
    classified: &'c [ClassifiedTask<'a>],
) -> impl Iterator<Item = (&'c ClassifiedTask<'a>, bool)> {
    classified.iter().filter_map(|task| {
        let committed = task.flags.tagged_basin == Some(Basin::B5);
        (committed || task.flags.eligible_b5).then_some((task, committed))
    })
}

#[cfg(test)]
mod tests {
    use super::{group_b5_slots, SlotMode, SlotRule, SlotSettings};
    use crate::basin::classified::classify_tasks;
    use crate::basin::settings::BasinSettings;
    use crate::graph::task_index::TaskIndex;
    use crate::model::task::TaskRecord;
    use crate::scoring::lexicon::StaticTagLexicon;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn all_mode_splits_candidates_from_committed() {
        let index = TaskIndex::build(vec![
            TaskRecord::new("a", "a").with_duration(20),
            TaskRecord::new("b", "b").with_tags(["#b5"]).with_duration(40),
            TaskRecord::new("c", "c"),
        ]);
        let lexicon = StaticTagLexicon::new();
        let classified = classify_tasks(&index, &lexicon, &BasinSettings::default(), today());

        let slots = group_b5_slots(&classified, &SlotSettings::default());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].slot_id, "all");
        assert_eq!(slots[0].candidates, vec!["a"]);
        assert_eq!(slots[0].committed, vec!["b"]);
        assert_eq!(slots[0].candidate_minutes, 20);
        assert_eq!(slots[0].committed_minutes, 40);
    }

    #[test]
    fn by_tag_keeps_empty_rule_slots_and_skips_empty_default() {
        let index = TaskIndex::build(vec![
            TaskRecord::new("a", "a").with_tags(["#home"]).with_duration(20),
        ]);
        let lexicon = StaticTagLexicon::new();
        let classified = classify_tasks(&index, &lexicon, &BasinSettings::default(), today());
        let settings = SlotSettings {
            mode: SlotMode::ByTag {
                rules: vec![
                    SlotRule::new("work", ["#work"]),
                    SlotRule::new("home", ["home"]),
                ],
                default_slot_id: "other".to_string(),
            },
        };

        let slots = group_b5_slots(&classified, &settings);
        let ids: Vec<&str> = slots.iter().map(|slot| slot.slot_id.as_str()).collect();
        assert_eq!(ids, vec!["work", "home"]);
        assert!(slots[0].is_empty());
        assert_eq!(slots[1].candidates, vec!["a"]);
    }

    #[test]
    fn huge_durations_saturate_slot_totals() {
        let index = TaskIndex::build(vec![
            TaskRecord::new("a", "a").with_duration(3_000_000_000),
            TaskRecord::new("b", "b").with_duration(3_000_000_000),
            TaskRecord::new("c", "c").with_tags(["#b5"]).with_duration(3_000_000_000),
            TaskRecord::new("d", "d").with_tags(["#b5"]).with_duration(3_000_000_000),
        ]);
        let lexicon = StaticTagLexicon::new();
        let classified = classify_tasks(&index, &lexicon, &BasinSettings::default(), today());

        let slots = group_b5_slots(&classified, &SlotSettings::default());
        assert_eq!(slots[0].candidate_count, 2);
        assert_eq!(slots[0].candidate_minutes, u32::MAX);
        assert_eq!(slots[0].committed_minutes, u32::MAX);
    }
}
