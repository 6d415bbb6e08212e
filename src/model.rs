//! Core data types for the agency opening-hours service.
//!
//! This module defines the shared domain model imported by all other modules:
//! weekday codes, times of day, ranges, evaluation results, and the agency
//! record itself. It contains no I/O.

use serde::Serialize;
use std::fmt;

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Closed-marker written into canonical schedule lines.
pub const CLOSED_MARKER: &str = "Fermé";

/// Separator between a weekday code and its hours in a canonical line.
pub const DAY_SEPARATOR: &str = " : ";

/// Separator between two ranges on the same line.
pub const RANGE_SEPARATOR: &str = "/";

/// Line-break marker between canonical lines.
pub const LINE_BREAK: &str = "\n";

/// Number of minutes in a day; every `TimeOfDay` is strictly below this.
pub const MINUTES_PER_DAY: u16 = 1440;

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Day of the week, indexed from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WeekdayCode {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekdayCode {
    /// All days in index order, starting Sunday.
    pub const ALL: [WeekdayCode; 7] = [
        WeekdayCode::Sunday,
        WeekdayCode::Monday,
        WeekdayCode::Tuesday,
        WeekdayCode::Wednesday,
        WeekdayCode::Thursday,
        WeekdayCode::Friday,
        WeekdayCode::Saturday,
    ];

    /// Display order used by the normalizer and the listing tables.
    pub const MONDAY_FIRST: [WeekdayCode; 7] = [
        WeekdayCode::Monday,
        WeekdayCode::Tuesday,
        WeekdayCode::Wednesday,
        WeekdayCode::Thursday,
        WeekdayCode::Friday,
        WeekdayCode::Saturday,
        WeekdayCode::Sunday,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Day for a 0-6 index counted from Sunday. Indices wrap modulo 7.
    pub fn from_index(index: usize) -> WeekdayCode {
        Self::ALL[index % 7]
    }

    /// The day `offset` days after this one.
    pub fn plus_days(self, offset: usize) -> WeekdayCode {
        Self::from_index(self.index() + offset)
    }

    /// Two-letter prefix used in canonical schedule lines.
    pub fn code(self) -> &'static str {
        match self {
            WeekdayCode::Sunday => "DI",
            WeekdayCode::Monday => "LU",
            WeekdayCode::Tuesday => "MA",
            WeekdayCode::Wednesday => "ME",
            WeekdayCode::Thursday => "JE",
            WeekdayCode::Friday => "VE",
            WeekdayCode::Saturday => "SA",
        }
    }

    /// Lower-case French day name, as used in "Ouvre mercredi".
    pub fn french_name(self) -> &'static str {
        match self {
            WeekdayCode::Sunday => "dimanche",
            WeekdayCode::Monday => "lundi",
            WeekdayCode::Tuesday => "mardi",
            WeekdayCode::Wednesday => "mercredi",
            WeekdayCode::Thursday => "jeudi",
            WeekdayCode::Friday => "vendredi",
            WeekdayCode::Saturday => "samedi",
        }
    }

    /// Parses a two-letter canonical prefix (`"LU"`, `"ma"`, ...).
    pub fn from_code(code: &str) -> Option<WeekdayCode> {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|day| day.code().eq_ignore_ascii_case(code))
    }

    pub fn from_chrono(weekday: chrono::Weekday) -> WeekdayCode {
        Self::from_index(weekday.num_days_from_sunday() as usize)
    }
}

impl fmt::Display for WeekdayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// Times and ranges
// ---------------------------------------------------------------------------

/// Minutes since midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Builds a time from a minute count. Returns `None` outside `[0, 1440)`.
    pub fn from_minutes(minutes: u16) -> Option<TimeOfDay> {
        (minutes < MINUTES_PER_DAY).then_some(TimeOfDay(minutes))
    }

    /// Builds a time from 24-hour clock components.
    pub fn from_hm(hour: u16, minute: u16) -> Option<TimeOfDay> {
        if hour >= 24 || minute >= 60 {
            return None;
        }
        Some(TimeOfDay(hour * 60 + minute))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u16 {
        self.0 / 60
    }

    pub fn minute(self) -> u16 {
        self.0 % 60
    }

    /// Schedule notation, `"08:00"`.
    pub fn to_hhmm(self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }

    /// Display notation, `"08h00"`.
    pub fn to_display(self) -> String {
        format!("{:02}h{:02}", self.hour(), self.minute())
    }
}

/// An intra-day opening interval. `start` is the first open minute and `end`
/// the first closed minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeRange {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl TimeRange {
    /// Returns `None` unless `start < end`.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Option<TimeRange> {
        (start < end).then_some(TimeRange { start, end })
    }

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.start <= time && time < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.to_hhmm(), self.end.to_hhmm())
    }
}

// ---------------------------------------------------------------------------
// Evaluation results
// ---------------------------------------------------------------------------

/// Live opening status of an agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Ouvert",
            Status::Closed => CLOSED_MARKER,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why no next event could be named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unavailable {
    /// No line for the current weekday, or no schedule at all.
    Schedule,
    /// Lines exist but none yields a usable range.
    Hours,
}

/// The next status change, kept structured until it reaches the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextEvent {
    ClosesAt(TimeOfDay),
    OpensAt(TimeOfDay),
    OpensOn(WeekdayCode),
    Unavailable(Unavailable),
}

impl fmt::Display for NextEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextEvent::ClosesAt(time) => write!(f, "Ferme à {}", time.to_display()),
            NextEvent::OpensAt(time) => write!(f, "Ouvre à {}", time.to_display()),
            NextEvent::OpensOn(day) => write!(f, "Ouvre {}", day.french_name()),
            NextEvent::Unavailable(Unavailable::Schedule) => write!(f, "Horaire indisponible"),
            NextEvent::Unavailable(Unavailable::Hours) => write!(f, "Horaires indisponibles"),
        }
    }
}

/// Status plus next event for one agency at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub status: Status,
    pub next: NextEvent,
}

impl Evaluation {
    pub fn closed(next: NextEvent) -> Evaluation {
        Evaluation { status: Status::Closed, next }
    }

    pub fn unavailable() -> Evaluation {
        Self::closed(NextEvent::Unavailable(Unavailable::Schedule))
    }
}

// ---------------------------------------------------------------------------
// Agency record
// ---------------------------------------------------------------------------

/// Canonical agency attributes, independent of the feed provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Agency {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub fax: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Canonical schedule text, one `"<CODE> : <hours>"` line per day.
    pub schedule: String,
}

// ---------------------------------------------------------------------------
// Schedule diagnostics
// ---------------------------------------------------------------------------

/// Non-fatal problems found while decoding a schedule. They never fail an
/// evaluation; they are collected for logging and verification reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleIssue {
    /// No line for this weekday.
    MissingDayLine(WeekdayCode),
    /// The line for this weekday is neither closed-marked nor contains a
    /// usable `HH:MM-HH:MM` range.
    UnparsableRange { day: WeekdayCode, line: String },
    /// The whole schedule text is empty.
    ScheduleUnavailable,
}

impl fmt::Display for ScheduleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleIssue::MissingDayLine(day) => write!(f, "Missing day line: {}", day),
            ScheduleIssue::UnparsableRange { day, line } => {
                write!(f, "Unparsable range for {}: '{}'", day, line)
            }
            ScheduleIssue::ScheduleUnavailable => write!(f, "Schedule unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or reading the agency directory feed.
#[derive(Debug, PartialEq)]
pub enum IngestError {
    /// Non-2xx HTTP response from the directory API.
    HttpError(u16),
    /// The request never produced a response (DNS, TLS, timeout).
    RequestFailed(String),
    /// The response body could not be deserialized.
    ParseError(String),
    /// A saved feed could not be read from disk.
    Io(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::HttpError(code) => write!(f, "HTTP error: {}", code),
            IngestError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            IngestError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            IngestError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for IngestError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_round_trips_and_wraps() {
        for (i, day) in WeekdayCode::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
            assert_eq!(WeekdayCode::from_index(i), *day);
        }
        assert_eq!(WeekdayCode::Saturday.plus_days(1), WeekdayCode::Sunday);
        assert_eq!(WeekdayCode::Tuesday.plus_days(7), WeekdayCode::Tuesday);
    }

    #[test]
    fn test_weekday_codes_parse_case_insensitively() {
        assert_eq!(WeekdayCode::from_code("LU"), Some(WeekdayCode::Monday));
        assert_eq!(WeekdayCode::from_code(" me "), Some(WeekdayCode::Wednesday));
        assert_eq!(WeekdayCode::from_code("XX"), None);
    }

    #[test]
    fn test_weekday_from_chrono_matches_sunday_index() {
        assert_eq!(WeekdayCode::from_chrono(chrono::Weekday::Sun), WeekdayCode::Sunday);
        assert_eq!(WeekdayCode::from_chrono(chrono::Weekday::Fri), WeekdayCode::Friday);
    }

    #[test]
    fn test_time_of_day_bounds() {
        assert!(TimeOfDay::from_minutes(0).is_some());
        assert!(TimeOfDay::from_minutes(1439).is_some());
        assert!(TimeOfDay::from_minutes(1440).is_none());
        assert!(TimeOfDay::from_hm(24, 0).is_none());
        assert!(TimeOfDay::from_hm(12, 60).is_none());
        assert_eq!(TimeOfDay::from_hm(7, 45).map(TimeOfDay::minutes), Some(465));
    }

    #[test]
    fn test_time_formatting_is_zero_padded() {
        let t = TimeOfDay::from_hm(8, 5).unwrap();
        assert_eq!(t.to_hhmm(), "08:05");
        assert_eq!(t.to_display(), "08h05");
    }

    #[test]
    fn test_range_is_half_open() {
        let r = TimeRange::new(
            TimeOfDay::from_hm(8, 0).unwrap(),
            TimeOfDay::from_hm(12, 0).unwrap(),
        )
        .unwrap();
        assert!(r.contains(TimeOfDay::from_hm(8, 0).unwrap()));
        assert!(r.contains(TimeOfDay::from_hm(11, 59).unwrap()));
        assert!(!r.contains(TimeOfDay::from_hm(12, 0).unwrap()));
        assert_eq!(r.to_string(), "08:00-12:00");
    }

    #[test]
    fn test_range_rejects_empty_or_inverted() {
        let a = TimeOfDay::from_hm(9, 0).unwrap();
        let b = TimeOfDay::from_hm(8, 0).unwrap();
        assert!(TimeRange::new(a, a).is_none());
        assert!(TimeRange::new(a, b).is_none());
    }

    #[test]
    fn test_next_event_french_text() {
        let t = TimeOfDay::from_hm(15, 30).unwrap();
        assert_eq!(NextEvent::ClosesAt(t).to_string(), "Ferme à 15h30");
        assert_eq!(NextEvent::OpensAt(t).to_string(), "Ouvre à 15h30");
        assert_eq!(
            NextEvent::OpensOn(WeekdayCode::Wednesday).to_string(),
            "Ouvre mercredi"
        );
        assert_eq!(
            NextEvent::Unavailable(Unavailable::Schedule).to_string(),
            "Horaire indisponible"
        );
    }

    #[test]
    fn test_ingest_error_display() {
        assert_eq!(IngestError::HttpError(503).to_string(), "HTTP error: 503");
        assert_eq!(
            IngestError::ParseError("eof".into()).to_string(),
            "Parse error: eof"
        );
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(Status::Open.label(), "Ouvert");
        assert_eq!(Status::Closed.label(), "Fermé");
    }
}
