//! `HH:MM` parsing and minute arithmetic on local instants.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

static HHMM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d{1,2}):(\d{2})\s*$").expect("valid HH:MM regex"));

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Minutes after midnight for an `HH:MM` string.
///
/// `24:00` is accepted as the end of the day.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let caps = HHMM_RE.captures(value)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    match hours {
        0..=23 => Some(hours * 60 + minutes),
        24 if minutes == 0 => Some(MINUTES_PER_DAY),
        _ => None,
    }
}

/// Instant `offset_minutes` after midnight of `day`.
pub fn at(day: NaiveDate, offset_minutes: u32) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(offset_minutes))
}

pub fn plus_minutes(instant: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    instant + Duration::minutes(i64::from(minutes))
}

pub fn minus_minutes(instant: NaiveDateTime, minutes: u32) -> NaiveDateTime {
    instant - Duration::minutes(i64::from(minutes))
}
