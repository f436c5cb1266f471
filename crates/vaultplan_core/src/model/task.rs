//! Task record snapshot model.
//!
//! # Responsibility
//! - Define the read-only task shape consumed by every planning engine.
//! - Parse the `scheduled` marker, which may carry a date only or a date and
//!   a local time of day.
//!
//! # Invariants
//! - `id` is the only identity that survives across planning runs.
//! - Records are never mutated by engines; callers own the snapshot.
//! - Tag comparison is case-insensitive and ignores one leading `#`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};

static SCHEDULED_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{2})-(\d{2})(?:[T ](\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("valid scheduled regex")
});

/// Stable task identifier supplied by the host index.
pub type TaskId = String;

/// Scheduled marker: a calendar date with an optional wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScheduledAt {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl ScheduledAt {
    pub fn on(date: NaiveDate) -> Self {
        Self { date, time: None }
    }

    pub fn at(instant: NaiveDateTime) -> Self {
        Self {
            date: instant.date(),
            time: Some(instant.time()),
        }
    }

    /// Returns the exact instant when a time of day is known.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        self.time.map(|time| self.date.and_time(time))
    }

    /// Parses `YYYY-MM-DD` or `YYYY-MM-DD[T ]HH:MM[:SS]`.
    pub fn parse(value: &str) -> Result<Self, ScheduledAtParseError> {
        let trimmed = value.trim();
        let caps = SCHEDULED_RE
            .captures(trimmed)
            .ok_or_else(|| ScheduledAtParseError::Malformed(trimmed.to_string()))?;

        let number = |idx: usize| -> u32 {
            caps.get(idx)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0)
        };
        let year = caps
            .get(1)
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .unwrap_or(0);
        let date = NaiveDate::from_ymd_opt(year, number(2), number(3))
            .ok_or_else(|| ScheduledAtParseError::InvalidDate(trimmed.to_string()))?;

        if caps.get(4).is_none() {
            return Ok(Self::on(date));
        }
        let time = NaiveTime::from_hms_opt(number(4), number(5), number(6))
            .ok_or_else(|| ScheduledAtParseError::InvalidTime(trimmed.to_string()))?;
        Ok(Self {
            date,
            time: Some(time),
        })
    }
}

impl Display for ScheduledAt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.time {
            Some(time) => write!(f, "{}T{}", self.date.format("%Y-%m-%d"), time.format("%H:%M")),
            None => write!(f, "{}", self.date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for ScheduledAt {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ScheduledAt {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Errors from parsing a scheduled marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledAtParseError {
    Malformed(String),
    InvalidDate(String),
    InvalidTime(String),
}

impl Display for ScheduledAtParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(value) => write!(
                f,
                "scheduled value `{value}` must be YYYY-MM-DD or YYYY-MM-DDTHH:MM"
            ),
            Self::InvalidDate(value) => write!(f, "scheduled value `{value}` has no such date"),
            Self::InvalidTime(value) => write!(f, "scheduled value `{value}` has no such time"),
        }
    }
}

impl Error for ScheduledAtParseError {}

/// Date markers attached to a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDates {
    #[serde(default)]
    pub created: Option<NaiveDate>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled: Option<ScheduledAt>,
}

impl TaskDates {
    /// Date used by day-level checks: scheduled wins over due.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.scheduled.map(|s| s.date).or(self.due)
    }

    pub fn has_deadline_marker(&self) -> bool {
        self.due.is_some() || self.scheduled.is_some()
    }
}

/// Immutable task snapshot produced by the host index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dates: TaskDates,
    /// Estimated minutes.
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub is_authority: bool,
    /// Ids of tasks that must resolve before this one can proceed.
    #[serde(default)]
    pub depends_on: Vec<TaskId>,
    /// Ids of tasks this one is a sub-part of.
    #[serde(default)]
    pub part_of: Vec<TaskId>,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, markdown: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            markdown: markdown.into(),
            path: String::new(),
            tags: Vec::new(),
            dates: TaskDates::default(),
            duration: None,
            is_authority: false,
            depends_on: Vec::new(),
            part_of: Vec::new(),
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration = Some(minutes);
        self
    }

    pub fn with_due(mut self, due: NaiveDate) -> Self {
        self.dates.due = Some(due);
        self
    }

    pub fn with_created(mut self, created: NaiveDate) -> Self {
        self.dates.created = Some(created);
        self
    }

    pub fn with_scheduled(mut self, scheduled: ScheduledAt) -> Self {
        self.dates.scheduled = Some(scheduled);
        self
    }

    pub fn with_authority(mut self, is_authority: bool) -> Self {
        self.is_authority = is_authority;
        self
    }

    pub fn depending_on(mut self, prerequisite: impl Into<String>) -> Self {
        self.depends_on.push(prerequisite.into());
        self
    }

    pub fn child_of(mut self, parent: impl Into<String>) -> Self {
        self.part_of.push(parent.into());
        self
    }

    /// Positive estimated minutes, if any.
    pub fn minutes(&self) -> Option<u32> {
        self.duration.filter(|minutes| *minutes > 0)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = normalize_tag(tag);
        !wanted.is_empty() && self.tags.iter().any(|t| normalize_tag(t) == wanted)
    }

    /// First non-empty markdown line without the checkbox prefix.
    pub fn title(&self) -> String {
        let line = self
            .markdown
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("");
        let stripped = ["- [ ] ", "- [x] ", "- [X] ", "- "]
            .iter()
            .find_map(|prefix| line.strip_prefix(*prefix))
            .unwrap_or(line);
        if stripped.is_empty() {
            self.id.clone()
        } else {
            stripped.to_string()
        }
    }
}

/// Lowercases and strips one leading `#`.
pub fn normalize_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    trimmed
        .strip_prefix('#')
        .unwrap_or(trimmed)
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{normalize_tag, ScheduledAt, ScheduledAtParseError, TaskRecord};
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn parses_date_only_and_date_time_markers() {
        let date_only = ScheduledAt::parse("2026-10-17").unwrap();
        assert_eq!(date_only.date, NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!(date_only.time, None);
        assert_eq!(date_only.instant(), None);

        let with_time = ScheduledAt::parse("2026-10-17T15:00").unwrap();
        assert_eq!(with_time.time, NaiveTime::from_hms_opt(15, 0, 0));

        let spaced = ScheduledAt::parse(" 2026-10-17 9:05:30 ").unwrap();
        assert_eq!(spaced.time, NaiveTime::from_hms_opt(9, 5, 30));
    }

    #[test]
    fn rejects_impossible_markers() {
        assert!(matches!(
            ScheduledAt::parse("tomorrow"),
            Err(ScheduledAtParseError::Malformed(_))
        ));
        assert!(matches!(
            ScheduledAt::parse("2026-02-30"),
            Err(ScheduledAtParseError::InvalidDate(_))
        ));
        assert!(matches!(
            ScheduledAt::parse("2026-02-03T25:00"),
            Err(ScheduledAtParseError::InvalidTime(_))
        ));
    }

    #[test]
    fn tag_matching_ignores_case_and_hash() {
        assert_eq!(normalize_tag("  #B5 "), "b5");
        let task = TaskRecord::new("t1", "- [ ] write").with_tags(["#Basin/B5"]);
        assert!(task.has_tag("basin/b5"));
        assert!(!task.has_tag("#"));
    }

    #[test]
    fn title_strips_checkbox_prefix() {
        let task = TaskRecord::new("t1", "\n- [ ] call the bank\nmore");
        assert_eq!(task.title(), "call the bank");
        assert_eq!(TaskRecord::new("t2", "").title(), "t2");
    }
}
