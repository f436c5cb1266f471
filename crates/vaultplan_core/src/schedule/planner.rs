//! End-to-end day planning: score, classify, lay out the timeline, compile
//! blocks and fill them.

use crate::basin::classified::classify_tasks;
use crate::config::PlannerSettings;
use crate::graph::task_index::TaskIndex;
use crate::model::schedule::{
    FixedEvent, FixedKind, FreeSlot, ScheduleItem, ScheduledTask, TimeBlockPlan,
};
use crate::schedule::compiler::compile_blocks_from_profile;
use crate::schedule::context::{build_day_context, DayContext};
use crate::schedule::filler::{fill_blocks, TaskPools};
use crate::schedule::profiles::select_grand_profile;
use crate::schedule::timeline::{build_fixed_events, compute_free_slots, detect_overlaps};
use crate::scoring::engine::ScoredTask;
use crate::scoring::lexicon::TagLexicon;
use chrono::NaiveDateTime;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeSet;

/// Everything the day and now views render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySchedule {
    pub context: DayContext,
    pub profile_id: Option<String>,
    pub fixed: Vec<FixedEvent>,
    pub free_slots: Vec<FreeSlot>,
    pub blocks: Vec<TimeBlockPlan>,
    /// Each block followed by the tasks placed in it.
    pub items: Vec<ScheduleItem>,
    pub diagnostics: Vec<String>,
    /// Every task, best score first.
    pub all_tasks: Vec<ScoredTask>,
}

impl DaySchedule {
    pub fn placed_tasks(&self) -> impl Iterator<Item = &ScheduledTask> {
        self.items.iter().filter_map(|item| match item {
            ScheduleItem::Task(task) => Some(task),
            ScheduleItem::Block(_) => None,
        })
    }
}

/// Scores, classifies and schedules one day.
pub fn plan_day<L: TagLexicon + ?Sized>(
    index: &TaskIndex,
    lexicon: &L,
    settings: &PlannerSettings,
    now: NaiveDateTime,
) -> DaySchedule {
    let mut diagnostics: Vec<String> = index.diagnostics().to_vec();

    let classified = classify_tasks(index, lexicon, &settings.basin, now.date());
    let (context, context_diagnostics) =
        build_day_context(index, &settings.basin, &settings.schedule, now);
    diagnostics.extend(context_diagnostics);

    let fixed = build_fixed_events(&context, index, &settings.schedule);
    diagnostics.extend(detect_overlaps(&fixed));
    let free_slots = compute_free_slots(&fixed, context.day_start, context.day_end);
    if free_slots.is_empty() {
        diagnostics.push("timeline: no free time left in the day horizon".to_string());
    }

    let (profile, profile_diagnostics) =
        select_grand_profile(&settings.day_profiles, context.today);
    diagnostics.extend(profile_diagnostics);
    let (blocks, compile_diagnostics) = compile_blocks_from_profile(
        &context,
        &free_slots,
        &settings.day_profiles,
        profile,
        &settings.schedule,
    );
    diagnostics.extend(compile_diagnostics);

    let mut excluded: BTreeSet<String> = fixed
        .iter()
        .filter(|event| event.kind == FixedKind::Rendezvous)
        .filter_map(|event| event.group_id.clone())
        .collect();
    excluded.extend(context.r0.task_id.clone());
    let pools = TaskPools::build(
        &classified,
        &excluded,
        settings.schedule.default_task_minutes,
    );
    let placed = fill_blocks(&blocks, &pools, &context);
    debug!(
        "event=fill_blocks module=schedule status=ok pool_entries={} placed={}",
        pools.entries().len(),
        placed.len()
    );

    let items = interleave(&blocks, &placed);
    info!(
        "event=plan_day module=schedule status=ok tasks={} fixed={} blocks={} placed={} r0_done={} diagnostics={}",
        index.len(),
        fixed.len(),
        blocks.len(),
        placed.len(),
        context.is_r0_done(),
        diagnostics.len()
    );

    DaySchedule {
        profile_id: profile.map(|profile| profile.id.clone()),
        context,
        fixed,
        free_slots,
        blocks,
        items,
        diagnostics,
        all_tasks: classified.into_iter().map(|task| task.scored).collect(),
    }
}

fn interleave(blocks: &[TimeBlockPlan], placed: &[ScheduledTask]) -> Vec<ScheduleItem> {
    let mut items = Vec::with_capacity(blocks.len() + placed.len());
    for (block_index, block) in blocks.iter().enumerate() {
        items.push(ScheduleItem::Block(block.clone()));
        items.extend(
            placed
                .iter()
                .filter(|task| task.block_index == block_index)
                .cloned()
                .map(ScheduleItem::Task),
        );
    }
    items
}
