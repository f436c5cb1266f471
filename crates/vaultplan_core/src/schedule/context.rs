//! Per-run day context and R0 detection.
//!
//! # Invariants
//! - Malformed clock values fall back to defaults with a diagnostic.
//! - Lunch never ends past midnight.

use crate::basin::settings::BasinSettings;
use crate::config::schedule_options::{
    ScheduleOptions, DEFAULT_DAY_END, DEFAULT_DAY_START, DEFAULT_LUNCH_START,
};
use crate::graph::task_index::TaskIndex;
use crate::model::basin::Basin;
use crate::schedule::clock::{at, parse_hhmm, MINUTES_PER_DAY};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// State of the daily R0 review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct R0Status {
    /// Task carrying the R0 tag, if any.
    pub task_id: Option<String>,
    /// Scheduled date, else due date, of that task.
    pub date: Option<NaiveDate>,
    pub is_done: bool,
}

/// Per-run facts every later stage reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayContext {
    pub today: NaiveDate,
    pub now: NaiveDateTime,
    pub day_start: NaiveDateTime,
    pub day_end: NaiveDateTime,
    pub lunch_start: NaiveDateTime,
    pub lunch_end: NaiveDateTime,
    pub has_committed_task: bool,
    pub r0: R0Status,
}

impl DayContext {
    pub fn is_r0_done(&self) -> bool {
        self.r0.is_done
    }

    pub fn r0_task_id(&self) -> Option<&str> {
        self.r0.task_id.as_deref()
    }
}

/// Resolves the day horizon, committed state and the R0 gate.
pub fn build_day_context(
    index: &TaskIndex,
    basin: &BasinSettings,
    options: &ScheduleOptions,
    now: NaiveDateTime,
) -> (DayContext, Vec<String>) {
    let today = now.date();
    let mut diagnostics = Vec::new();

    let mut start = clock_or_default(
        "day_start",
        &options.day_start,
        DEFAULT_DAY_START,
        &mut diagnostics,
    );
    let mut end = clock_or_default("day_end", &options.day_end, DEFAULT_DAY_END, &mut diagnostics);
    if end <= start {
        diagnostics.push(format!(
            "schedule: day_end `{}` is not after day_start `{}`; using {}-{}",
            options.day_end, options.day_start, DEFAULT_DAY_START, DEFAULT_DAY_END
        ));
        start = parse_hhmm(DEFAULT_DAY_START).unwrap_or(450);
        end = parse_hhmm(DEFAULT_DAY_END).unwrap_or(1410);
    }
    let lunch = clock_or_default(
        "lunch_start",
        &options.lunch_start,
        DEFAULT_LUNCH_START,
        &mut diagnostics,
    );
    let lunch_end = match lunch.checked_add(options.lunch_minutes) {
        Some(lunch_end) if lunch_end <= MINUTES_PER_DAY => lunch_end,
        _ => {
            diagnostics.push(format!(
                "schedule: lunch_minutes {} runs past midnight; lunch ends with the day",
                options.lunch_minutes
            ));
            end.max(lunch)
        }
    };

    let has_committed_task = index
        .tasks()
        .iter()
        .any(|task| basin.tagged_basin(task) == Some(Basin::B5));
    let r0 = detect_r0(index, &options.r0_tag, today, &mut diagnostics);

    let context = DayContext {
        today,
        now,
        day_start: at(today, start),
        day_end: at(today, end),
        lunch_start: at(today, lunch),
        lunch_end: at(today, lunch_end),
        has_committed_task,
        r0,
    };
    (context, diagnostics)
}

fn clock_or_default(
    name: &str,
    value: &str,
    fallback: &str,
    diagnostics: &mut Vec<String>,
) -> u32 {
    match parse_hhmm(value) {
        Some(minutes) => minutes,
        None => {
            diagnostics.push(format!(
                "schedule: {name} `{value}` is not HH:MM; using {fallback}"
            ));
            parse_hhmm(fallback).unwrap_or(0)
        }
    }
}

fn detect_r0(
    index: &TaskIndex,
    r0_tag: &str,
    today: NaiveDate,
    diagnostics: &mut Vec<String>,
) -> R0Status {
    let mut tagged: Vec<_> = index
        .tasks()
        .iter()
        .filter(|task| task.has_tag(r0_tag))
        .collect();
    tagged.sort_by(|a, b| a.id.cmp(&b.id));

    let Some(task) = tagged.first() else {
        return R0Status {
            task_id: None,
            date: None,
            is_done: true,
        };
    };
    if tagged.len() > 1 {
        diagnostics.push(format!(
            "r0: {} tasks carry `{r0_tag}`; using `{}`",
            tagged.len(),
            task.id
        ));
    }

    let date = task.dates.anchor_date();
    R0Status {
        task_id: Some(task.id.clone()),
        date,
        is_done: date.is_some_and(|date| date != today),
    }
}

#[cfg(test)]
mod tests {
    use super::build_day_context;
    use crate::schedule::clock::{at, MINUTES_PER_DAY};
    use crate::basin::settings::BasinSettings;
    use crate::config::schedule_options::ScheduleOptions;
    use crate::graph::task_index::TaskIndex;
    use crate::model::task::TaskRecord;
    use chrono::NaiveDate;

    fn now() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 17)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    #[test]
    fn malformed_clock_values_fall_back_with_diagnostics() {
        let options = ScheduleOptions {
            day_start: "7.30".to_string(),
            ..ScheduleOptions::default()
        };
        let (context, diagnostics) =
            build_day_context(&TaskIndex::default(), &BasinSettings::default(), &options, now());
        assert_eq!(context.day_start.format("%H:%M").to_string(), "07:30");
        assert_eq!(diagnostics.len(), 1);
        assert!(context.is_r0_done());
    }

    #[test]
    fn oversized_lunch_ends_at_midnight() {
        let options = ScheduleOptions {
            lunch_minutes: u32::MAX,
            ..ScheduleOptions::default()
        };
        let (context, diagnostics) =
            build_day_context(&TaskIndex::default(), &BasinSettings::default(), &options, now());
        assert_eq!(context.lunch_end, at(now().date(), MINUTES_PER_DAY));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].contains("lunch_minutes"));
    }

    #[test]
    fn inverted_horizon_uses_defaults() {
        let options = ScheduleOptions {
            day_start: "20:00".to_string(),
            day_end: "08:00".to_string(),
            ..ScheduleOptions::default()
        };
        let (context, diagnostics) =
            build_day_context(&TaskIndex::default(), &BasinSettings::default(), &options, now());
        assert_eq!(context.day_end.format("%H:%M").to_string(), "23:30");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn undated_r0_task_gates_and_lowest_id_wins() {
        let index = TaskIndex::build(vec![
            TaskRecord::new("r0-b", "review").with_tags(["#r0"]),
            TaskRecord::new("r0-a", "review").with_tags(["#R0"]),
            TaskRecord::new("x", "x").with_tags(["#b5"]),
        ]);
        let (context, diagnostics) = build_day_context(
            &index,
            &BasinSettings::default(),
            &ScheduleOptions::default(),
            now(),
        );
        assert_eq!(context.r0_task_id(), Some("r0-a"));
        assert!(!context.is_r0_done());
        assert!(context.has_committed_task);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn r0_dated_another_day_counts_as_done() {
        let yesterday = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let index = TaskIndex::build(vec![TaskRecord::new("r0", "review")
            .with_tags(["#r0"])
            .with_due(yesterday)]);
        let (context, _) = build_day_context(
            &index,
            &BasinSettings::default(),
            &ScheduleOptions::default(),
            now(),
        );
        assert!(context.is_r0_done());
    }
}
