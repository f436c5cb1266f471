//! Block compiler.
//!
//! # Responsibility
//! - Project the selected profile's recipes onto today's free slots.
//! - Emit the R0 governance block instead while the review is pending.
//!
//! # Invariants
//! - Blocks never leave free time.
//! - Chunks shorter than `MIN_GRAIN_MINUTES` are dropped.
//! - A pending R0 yields at most one block: the first free remainder that
//!   holds the whole review, else the first one of at least
//!   `MIN_GRAIN_MINUTES`, truncated.

use crate::config::day_profiles::{BlockRecipe, DayProfileSettings, GrandProfile};
use crate::config::schedule_options::ScheduleOptions;
use crate::model::schedule::{
    minutes_between, AttentionProfile, BlockKind, FreeSlot, TimeBlockPlan,
};
use crate::schedule::clock::{at, plus_minutes};
use crate::schedule::context::DayContext;
use crate::schedule::profiles::recipes_for_day;
use crate::schedule::{MIN_GRAIN_MINUTES, R0_MAX_MINUTES};
use chrono::{NaiveDateTime, Timelike};
use log::trace;

/// Recipe id recorded on the R0 governance block.
pub const R0_RECIPE_ID: &str = "r0";

/// Turns the selected profile into concrete blocks inside the free slots.
///
/// While R0 is pending only the governance block is produced.
pub fn compile_blocks_from_profile(
    context: &DayContext,
    free_slots: &[FreeSlot],
    settings: &DayProfileSettings,
    profile: Option<&GrandProfile>,
    options: &ScheduleOptions,
) -> (Vec<TimeBlockPlan>, Vec<String>) {
    if !context.is_r0_done() {
        return compile_r0_gate(context, free_slots, options);
    }

    let mut diagnostics = Vec::new();
    let Some(profile) = profile else {
        return (Vec::new(), diagnostics);
    };

    let (recipes, recipe_diagnostics) = recipes_for_day(settings, profile, context.today);
    diagnostics.extend(recipe_diagnostics);

    let mut blocks = Vec::new();
    for recipe in recipes {
        if recipe.kind == BlockKind::GovernanceCommit && context.has_committed_task {
            diagnostics.push(format!(
                "compiler: recipe `{}` skipped; a task is already committed",
                recipe.id
            ));
            continue;
        }
        blocks.extend(project_recipe(context, free_slots, recipe, &profile.id));
    }
    sort_blocks(&mut blocks);

    if blocks.is_empty() {
        diagnostics.push(format!(
            "compiler: profile `{}` yields no blocks in today's free time",
            profile.id
        ));
    }
    (blocks, diagnostics)
}

fn compile_r0_gate(
    context: &DayContext,
    free_slots: &[FreeSlot],
    options: &ScheduleOptions,
) -> (Vec<TimeBlockPlan>, Vec<String>) {
    let mut diagnostics = vec!["r0: daily review pending; other blocks are withheld".to_string()];
    let minutes = options.r0_minutes.min(R0_MAX_MINUTES);
    let now = floor_to_minute(context.now);

    let remainders: Vec<(NaiveDateTime, NaiveDateTime, u32)> = free_slots
        .iter()
        .filter(|slot| slot.end > now)
        .map(|slot| {
            let start = now.max(slot.start);
            let room = u32::try_from(minutes_between(start, slot.end)).unwrap_or(0);
            (start, slot.end, room)
        })
        .collect();

    // First remainder holding the whole review, else the first one worth a
    // truncated review.
    let placed = remainders
        .iter()
        .find(|(_, _, room)| *room >= minutes.max(1))
        .or_else(|| {
            remainders
                .iter()
                .find(|(_, _, room)| *room >= MIN_GRAIN_MINUTES.min(minutes.max(1)))
        })
        .and_then(|&(start, slot_end, _)| {
            let end = plus_minutes(start, minutes).min(slot_end);
            block_between(BlockKind::GovernanceR0, start, end, AttentionProfile::Admin)
        });

    match placed {
        Some(mut block) => {
            block.recipe_id = R0_RECIPE_ID.to_string();
            (vec![block], diagnostics)
        }
        None => {
            diagnostics.push("r0: no free slot left today for the review block".to_string());
            (Vec::new(), diagnostics)
        }
    }
}

/// Intersects the recipe window with every free slot and chunks the overlap.
fn project_recipe(
    context: &DayContext,
    free_slots: &[FreeSlot],
    recipe: &BlockRecipe,
    profile_id: &str,
) -> Vec<TimeBlockPlan> {
    let Some((window_start, window_end)) = recipe.window() else {
        return Vec::new();
    };
    let window_start = at(context.today, window_start);
    let window_end = at(context.today, window_end);
    let chunk = recipe.chunk_minutes.max(1);

    let mut blocks = Vec::new();
    for slot in free_slots {
        let start = window_start.max(slot.start);
        let end = window_end.min(slot.end);
        let mut cursor = start;
        while cursor < end {
            let remaining = u32::try_from(minutes_between(cursor, end)).unwrap_or(0);
            let length = chunk.min(remaining);
            if length < MIN_GRAIN_MINUTES {
                break;
            }
            let chunk_end = plus_minutes(cursor, length);
            if let Some(mut block) =
                block_between(recipe.kind.clone(), cursor, chunk_end, recipe.profile)
            {
                block.recipe_id = recipe.id.clone();
                block.priority = recipe.priority;
                block.min_urgency = recipe.min_urgency;
                block.allow_authority = recipe.allow_authority;
                block.max_tasks = recipe.max_tasks;
                trace!(
                    "event=block_compiled module=schedule recipe={} profile={} minutes={}",
                    recipe.id,
                    profile_id,
                    block.minutes
                );
                blocks.push(block);
            }
            cursor = chunk_end;
        }
    }
    blocks
}

fn block_between(
    kind: BlockKind,
    start: NaiveDateTime,
    end: NaiveDateTime,
    profile: AttentionProfile,
) -> Option<TimeBlockPlan> {
    let minutes = u32::try_from(minutes_between(start, end)).ok()?;
    if minutes == 0 {
        return None;
    }
    Some(TimeBlockPlan {
        kind,
        start,
        end,
        minutes,
        profile,
        recipe_id: String::new(),
        priority: 0,
        min_urgency: None,
        allow_authority: None,
        max_tasks: None,
    })
}

/// Deterministic block order: start, priority, kind, profile, recipe id.
pub fn sort_blocks(blocks: &mut [TimeBlockPlan]) {
    blocks.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.priority.cmp(&b.priority))
            .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
            .then(a.profile.cmp(&b.profile))
            .then_with(|| a.recipe_id.cmp(&b.recipe_id))
    });
}

fn floor_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(instant)
}
