//! Decoding canonical schedule text into a `WeeklySchedule`.
//!
//! Each line is `"<CODE> : <hours>"`. The closed-marker is decoded here, once,
//! into `DaySchedule::Closed`; nothing downstream looks at the text again.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::{ScheduleIssue, TimeOfDay, TimeRange, WeekdayCode};
use crate::schedule::text::fold;

static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{2}):(\d{2})\s*-\s*(\d{2}):(\d{2})\b").expect("range pattern is valid")
});

// Matched against folded text, so "Fermé", "FERMEE" and "fermée" all hit.
static CLOSED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(ferme|fermee|closed)\b").expect("closed pattern is valid")
});

// ---------------------------------------------------------------------------
// Decoded schedule
// ---------------------------------------------------------------------------

/// One weekday's hours after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaySchedule {
    /// No line for this day in the source text.
    Missing,
    /// Closed-marked, or a line with no usable range.
    Closed,
    /// Merged ranges: non-empty, sorted, non-overlapping.
    Open(Vec<TimeRange>),
}

impl DaySchedule {
    pub fn is_open(&self) -> bool {
        matches!(self, DaySchedule::Open(_))
    }
}

/// Exactly one `DaySchedule` per weekday, indexed from Sunday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [DaySchedule; 7],
    issues: Vec<ScheduleIssue>,
}

impl WeeklySchedule {
    /// Decodes canonical schedule text. Never fails; problems are recorded
    /// as `ScheduleIssue`s and the affected days fall back to missing/closed.
    pub fn decode(text: &str) -> WeeklySchedule {
        let mut days: [DaySchedule; 7] = std::array::from_fn(|_| DaySchedule::Missing);
        let mut issues = Vec::new();

        if text.trim().is_empty() {
            issues.push(ScheduleIssue::ScheduleUnavailable);
            return WeeklySchedule { days, issues };
        }

        for day in WeekdayCode::ALL {
            let Some(hours) = find_line(text, day) else {
                issues.push(ScheduleIssue::MissingDayLine(day));
                continue;
            };

            days[day.index()] = if is_closed_marked(hours) {
                DaySchedule::Closed
            } else {
                let ranges = merge_ranges(extract_ranges(hours));
                if ranges.is_empty() {
                    issues.push(ScheduleIssue::UnparsableRange {
                        day,
                        line: hours.trim().to_string(),
                    });
                    DaySchedule::Closed
                } else {
                    DaySchedule::Open(ranges)
                }
            };
        }

        WeeklySchedule { days, issues }
    }

    pub fn day(&self, day: WeekdayCode) -> &DaySchedule {
        &self.days[day.index()]
    }

    pub fn issues(&self) -> &[ScheduleIssue] {
        &self.issues
    }

    /// True when no weekday has a line at all.
    pub fn is_unavailable(&self) -> bool {
        self.days.iter().all(|d| *d == DaySchedule::Missing)
    }
}

// ---------------------------------------------------------------------------
// Line-level helpers
// ---------------------------------------------------------------------------

/// Returns the hours part of the first line whose prefix is `day`'s code.
pub fn find_line(text: &str, day: WeekdayCode) -> Option<&str> {
    text.lines().find_map(|line| {
        let (prefix, hours) = split_line(line)?;
        (prefix == day).then_some(hours)
    })
}

/// Splits `"LU : 08:00-12:00"` into `(Monday, " 08:00-12:00")`. The prefix is
/// everything before the first colon.
pub fn split_line(line: &str) -> Option<(WeekdayCode, &str)> {
    let (prefix, hours) = line.split_once(':')?;
    let day = WeekdayCode::from_code(prefix)?;
    Some((day, hours))
}

/// Accent- and case-insensitive closed-marker detection.
pub fn is_closed_marked(hours: &str) -> bool {
    CLOSED_PATTERN.is_match(&fold(hours))
}

/// Every valid `HH:MM-HH:MM` in `hours`, in source order. Tokens with an
/// hour above 23, a minute above 59, or `start >= end` are skipped.
pub fn extract_ranges(hours: &str) -> Vec<TimeRange> {
    RANGE_PATTERN
        .captures_iter(hours)
        .filter_map(|caps| {
            let n = |i: usize| caps.get(i)?.as_str().parse::<u16>().ok();
            let start = TimeOfDay::from_hm(n(1)?, n(2)?)?;
            let end = TimeOfDay::from_hm(n(3)?, n(4)?)?;
            TimeRange::new(start, end)
        })
        .collect()
}

/// Sorts by start and merges overlapping or touching ranges, so
/// `07:45-11:30/11:30-15:30` becomes one `07:45-15:30` interval.
pub fn merge_ranges(mut ranges: Vec<TimeRange>) -> Vec<TimeRange> {
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<TimeRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(current) if range.start <= current.end => {
                current.end = current.end.max(range.end);
            }
            _ => merged.push(range),
        }
    }
    merged
}
