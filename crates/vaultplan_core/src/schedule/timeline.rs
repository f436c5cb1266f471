//! Fixed timeline and free-slot computation.
//!
//! # Invariants
//! - Intervals are half-open: back-to-back events do not overlap.
//! - Free slots and clipped fixed intervals together cover the horizon
//!   exactly; free slots never overlap a fixed interval.
//! - Overlaps are reported, never resolved.

use crate::config::schedule_options::{LogisticsOptions, ScheduleOptions};
use crate::graph::task_index::TaskIndex;
use crate::model::schedule::{FixedEvent, FixedKind, FreeSlot, LogisticsRole};
use crate::schedule::clock::{minus_minutes, plus_minutes};
use crate::schedule::context::DayContext;
use chrono::NaiveDateTime;

const LUNCH_LABEL: &str = "lunch";

/// Lunch, today's rendezvous and their logistics, sorted by start.
pub fn build_fixed_events(
    context: &DayContext,
    index: &TaskIndex,
    options: &ScheduleOptions,
) -> Vec<FixedEvent> {
    let mut events = Vec::new();

    let lunch_start = context.lunch_start.max(context.day_start);
    let lunch_end = context.lunch_end.min(context.day_end);
    if lunch_start < lunch_end {
        events.push(FixedEvent {
            kind: FixedKind::Meal,
            start: lunch_start,
            end: lunch_end,
            label: LUNCH_LABEL.to_string(),
            group_id: None,
            role: None,
        });
    }

    for task in index.tasks() {
        if context.r0_task_id() == Some(task.id.as_str()) {
            continue;
        }
        let Some(start) = task.dates.scheduled.and_then(|scheduled| scheduled.instant()) else {
            continue;
        };
        if start.date() != context.today {
            continue;
        }
        let minutes = task.minutes().unwrap_or(options.rendezvous_default_minutes);
        let rendezvous = FixedEvent {
            kind: FixedKind::Rendezvous,
            start,
            end: plus_minutes(start, minutes),
            label: task.title(),
            group_id: Some(task.id.clone()),
            role: None,
        };
        events.extend(expand_logistics(&rendezvous, &options.logistics));
        events.push(rendezvous);
    }

    sort_events(&mut events);
    events
}

/// Prep, travel and recovery intervals wrapped around `rendezvous`.
///
/// Components configured with zero minutes are omitted.
pub fn expand_logistics(rendezvous: &FixedEvent, logistics: &LogisticsOptions) -> Vec<FixedEvent> {
    let travel_start = minus_minutes(rendezvous.start, logistics.travel_before_minutes);
    let prep_start = minus_minutes(travel_start, logistics.prep_minutes);
    let travel_end = plus_minutes(rendezvous.end, logistics.travel_after_minutes);
    let recover_end = plus_minutes(travel_end, logistics.recover_minutes);

    [
        (LogisticsRole::Prep, prep_start, travel_start),
        (LogisticsRole::TravelBefore, travel_start, rendezvous.start),
        (LogisticsRole::TravelAfter, rendezvous.end, travel_end),
        (LogisticsRole::Recover, travel_end, recover_end),
    ]
    .into_iter()
    .filter(|(_, start, end)| start < end)
    .map(|(role, start, end)| FixedEvent {
        kind: FixedKind::Logistics,
        start,
        end,
        label: role.as_str().to_string(),
        group_id: rendezvous.group_id.clone(),
        role: Some(role),
    })
    .collect()
}

/// Non-fatal diagnostics for every pair of overlapping events, by start.
pub fn detect_overlaps(events: &[FixedEvent]) -> Vec<String> {
    let mut sorted: Vec<&FixedEvent> = events.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut diagnostics = Vec::new();
    for (i, first) in sorted.iter().enumerate() {
        for second in &sorted[i + 1..] {
            if second.start >= first.end {
                break;
            }
            diagnostics.push(format!(
                "timeline: {} {}-{} overlaps {} {}-{}",
                describe(first),
                first.start.format("%H:%M"),
                first.end.format("%H:%M"),
                describe(second),
                second.start.format("%H:%M"),
                second.end.format("%H:%M"),
            ));
        }
    }
    diagnostics
}

/// Gaps between fixed intervals inside `[day_start, day_end)`.
pub fn compute_free_slots(
    events: &[FixedEvent],
    day_start: NaiveDateTime,
    day_end: NaiveDateTime,
) -> Vec<FreeSlot> {
    let mut intervals: Vec<(NaiveDateTime, NaiveDateTime)> = events
        .iter()
        .map(|event| (event.start.max(day_start), event.end.min(day_end)))
        .filter(|(start, end)| start < end)
        .collect();
    intervals.sort();

    let mut slots = Vec::new();
    let mut cursor = day_start;
    for (start, end) in intervals {
        if start > cursor {
            slots.extend(FreeSlot::new(cursor, start));
        }
        cursor = cursor.max(end);
    }
    slots.extend(FreeSlot::new(cursor, day_end));
    slots
}

fn sort_events(events: &mut [FixedEvent]) {
    events.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(a.end.cmp(&b.end))
            .then_with(|| a.group_id.cmp(&b.group_id))
    });
}

fn describe(event: &FixedEvent) -> String {
    match (event.kind, &event.group_id, event.role) {
        (FixedKind::Meal, _, _) => event.label.clone(),
        (FixedKind::Rendezvous, Some(group), _) => format!("rendezvous `{group}`"),
        (FixedKind::Logistics, Some(group), Some(role)) => {
            format!("{} for `{group}`", role.as_str())
        }
        _ => event.label.clone(),
    }
}
