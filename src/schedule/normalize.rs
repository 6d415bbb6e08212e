//! Conversion of provider schedule representations into canonical text.
//!
//! Two input shapes are supported: a free-text blob that is already in
//! `"<CODE> : <hours>"` form, and a structured array of per-day records with
//! up to four boundary values. Both produce `\n`-separated canonical lines.

use chrono::{DateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::logging::{self, LogSource};
use crate::model::{CLOSED_MARKER, DAY_SEPARATOR, LINE_BREAK, RANGE_SEPARATOR, TimeOfDay, WeekdayCode};
use crate::schedule::text::fold;

static HTML_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("break pattern is valid"));

// ---------------------------------------------------------------------------
// Free text
// ---------------------------------------------------------------------------

/// Normalizes line endings only: CRLF, CR and HTML `<br>` tags become `\n`.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", LINE_BREAK).replace('\r', LINE_BREAK);
    HTML_BREAK.replace_all(&unified, LINE_BREAK).into_owned()
}

// ---------------------------------------------------------------------------
// Structured records
// ---------------------------------------------------------------------------

/// A boundary value as it appears in the feed: either a clock string
/// (`"08:00"`, `"08:00:00"`, RFC 3339) or an epoch-millisecond date field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Boundary {
    Millis(i64),
    Text(String),
}

impl Boundary {
    /// Resolves the boundary to a time of day in `zone`. Blank or
    /// unreadable values yield `None`.
    pub fn to_time(&self, zone: &Tz) -> Option<TimeOfDay> {
        match self {
            Boundary::Millis(ms) => {
                let instant = DateTime::<Utc>::from_timestamp_millis(*ms)?;
                let local = instant.with_timezone(zone);
                TimeOfDay::from_hm(local.hour() as u16, local.minute() as u16)
            }
            Boundary::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M")
                    .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                {
                    return TimeOfDay::from_hm(t.hour() as u16, t.minute() as u16);
                }
                let local = DateTime::parse_from_rfc3339(s).ok()?.with_timezone(zone);
                TimeOfDay::from_hm(local.hour() as u16, local.minute() as u16)
            }
        }
    }
}

/// One day of a structured schedule. Field aliases cover the upper-case
/// attribute names used by the ArcGIS feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DayHours {
    #[serde(default, alias = "jour", alias = "JOUR")]
    pub day: String,
    #[serde(default, alias = "debut_matin", alias = "DEBUT_MATIN")]
    pub first_start: Option<Boundary>,
    #[serde(default, alias = "fin_matin", alias = "FIN_MATIN")]
    pub first_end: Option<Boundary>,
    #[serde(default, alias = "debut_apres_midi", alias = "DEBUT_APRES_MIDI")]
    pub second_start: Option<Boundary>,
    #[serde(default, alias = "fin_apres_midi", alias = "FIN_APRES_MIDI")]
    pub second_end: Option<Boundary>,
}

impl DayHours {
    /// The hours part of this day's canonical line.
    pub fn hours_text(&self, zone: &Tz) -> String {
        let resolve = |b: &Option<Boundary>| b.as_ref().and_then(|b| b.to_time(zone));
        let span = |a: TimeOfDay, b: TimeOfDay| format!("{}-{}", a.to_hhmm(), b.to_hhmm());

        match (
            resolve(&self.first_start),
            resolve(&self.first_end),
            resolve(&self.second_start),
            resolve(&self.second_end),
        ) {
            // Continuous day: only the outer boundaries are filled in
            (Some(open), None, None, Some(close)) => span(open, close),
            (Some(a), Some(b), Some(c), Some(d)) => {
                format!("{}{}{}", span(a, b), RANGE_SEPARATOR, span(c, d))
            }
            (Some(a), Some(b), _, _) => span(a, b),
            (_, _, Some(c), Some(d)) => span(c, d),
            _ => CLOSED_MARKER.to_string(),
        }
    }
}

/// Parses a day key: a two-letter code or a French/English day name, in any
/// case and with or without accents.
pub fn parse_day_key(key: &str) -> Option<WeekdayCode> {
    if let Some(day) = WeekdayCode::from_code(key) {
        return Some(day);
    }
    let day = match fold(key.trim()).as_str() {
        "dimanche" | "sunday" => WeekdayCode::Sunday,
        "lundi" | "monday" => WeekdayCode::Monday,
        "mardi" | "tuesday" => WeekdayCode::Tuesday,
        "mercredi" | "wednesday" => WeekdayCode::Wednesday,
        "jeudi" | "thursday" => WeekdayCode::Thursday,
        "vendredi" | "friday" => WeekdayCode::Friday,
        "samedi" | "saturday" => WeekdayCode::Saturday,
        _ => return None,
    };
    Some(day)
}

/// Builds canonical text from structured records, Monday first. Days absent
/// from `records` are written closed; for duplicate days the first record
/// wins; records with an unknown day key are skipped.
pub fn normalize_days(records: &[DayHours], zone: &Tz) -> String {
    let mut by_day: HashMap<WeekdayCode, &DayHours> = HashMap::new();
    for record in records {
        match parse_day_key(&record.day) {
            Some(day) => {
                by_day.entry(day).or_insert(record);
            }
            None => logging::warn(
                LogSource::Schedule,
                None,
                &format!("Skipping structured hours with unknown day '{}'", record.day),
            ),
        }
    }

    WeekdayCode::MONDAY_FIRST
        .iter()
        .map(|day| {
            let hours = by_day
                .get(day)
                .map(|record| record.hours_text(zone))
                .unwrap_or_else(|| CLOSED_MARKER.to_string());
            format!("{}{}{}", day.code(), DAY_SEPARATOR, hours)
        })
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}
