//! Date-driven pressure buckets.
//!
//! Day distances are whole calendar days between the marker date and today.
//!
//! | signal    | bucket                                                      |
//! |-----------|-------------------------------------------------------------|
//! | due       | `<=0 -> 5`, `<=3 -> 4`, `<=7 -> 3`, `<=14 -> 2`, `<=30 -> 1` |
//! | scheduled | `<=0 -> 4`, `<=2 -> 3`, `<=7 -> 2`, `<=14 -> 1`              |
//! | created   | age `>=60 -> 3`, `>=30 -> 2`, `>=14 -> 1`                    |
//!
//! A created date in the future forces pressure 5. A created date older than
//! [`STALE_CREATED_DAYS`] with no due or scheduled marker forces gain 5.

use crate::model::dimensions::Dimensions;
use crate::model::task::TaskDates;
use chrono::NaiveDate;

/// Age after which an undated task is flagged as probably obsolete.
pub const STALE_CREATED_DAYS: i64 = 45;

const DUE_BUCKETS: &[(i64, u8)] = &[(0, 5), (3, 4), (7, 3), (14, 2), (30, 1)];
const SCHEDULED_BUCKETS: &[(i64, u8)] = &[(0, 4), (2, 3), (7, 2), (14, 1)];
const CREATED_AGE_BUCKETS: &[(i64, u8)] = &[(60, 3), (30, 2), (14, 1)];

fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

fn bucket_upto(distance: i64, buckets: &[(i64, u8)]) -> u8 {
    buckets
        .iter()
        .find(|(limit, _)| distance <= *limit)
        .map(|(_, pressure)| *pressure)
        .unwrap_or(0)
}

pub fn due_pressure(due: NaiveDate, today: NaiveDate) -> u8 {
    bucket_upto(days_until(due, today), DUE_BUCKETS)
}

pub fn scheduled_pressure(scheduled: NaiveDate, today: NaiveDate) -> u8 {
    bucket_upto(days_until(scheduled, today), SCHEDULED_BUCKETS)
}

/// Signals derived from the created date alone.
pub fn created_signal(created: NaiveDate, today: NaiveDate, has_deadline: bool) -> Dimensions {
    let age = (today - created).num_days();
    if age < 0 {
        return Dimensions::pressure(5);
    }
    let pressure = CREATED_AGE_BUCKETS
        .iter()
        .find(|(min_age, _)| age >= *min_age)
        .map(|(_, pressure)| i64::from(*pressure))
        .unwrap_or(0);
    let gain = if age > STALE_CREATED_DAYS && !has_deadline {
        5
    } else {
        0
    };
    Dimensions::new(gain, pressure, 0)
}

/// Folds due, scheduled and created signals with element-wise max.
pub fn time_dimensions(dates: &TaskDates, today: NaiveDate) -> Dimensions {
    let mut signals = Vec::with_capacity(3);
    if let Some(due) = dates.due {
        signals.push(Dimensions::pressure(i64::from(due_pressure(due, today))));
    }
    if let Some(scheduled) = dates.scheduled {
        signals.push(Dimensions::pressure(i64::from(scheduled_pressure(
            scheduled.date,
            today,
        ))));
    }
    if let Some(created) = dates.created {
        signals.push(created_signal(created, today, dates.has_deadline_marker()));
    }
    Dimensions::fold(signals)
}
