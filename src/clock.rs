//! Time source for schedule evaluation.
//!
//! All evaluations read "now" in one fixed IANA zone, never the host's
//! local zone. The default zone is New Caledonia's.

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;

use crate::model::{TimeOfDay, WeekdayCode};

/// Reference zone for the deployment region.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Pacific::Noumea;

/// Current weekday and minute-of-day in the reference zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub weekday: WeekdayCode,
    pub minutes: TimeOfDay,
}

impl Moment {
    pub fn new(weekday: WeekdayCode, minutes: TimeOfDay) -> Moment {
        Moment { weekday, minutes }
    }
}

pub trait TimeSource {
    fn now(&self) -> Moment;
}

/// Wall-clock time converted into a fixed zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    zone: Tz,
}

impl ZonedClock {
    pub fn new(zone: Tz) -> ZonedClock {
        ZonedClock { zone }
    }

    /// Resolves an arbitrary UTC instant in this clock's zone.
    pub fn at(&self, instant: DateTime<Utc>) -> Moment {
        moment_in_zone(&self.zone, instant)
    }
}

impl Default for ZonedClock {
    fn default() -> Self {
        ZonedClock::new(DEFAULT_TIMEZONE)
    }
}

impl TimeSource for ZonedClock {
    fn now(&self) -> Moment {
        self.at(Utc::now())
    }
}

/// A clock pinned to one moment (tests and dev mode).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Moment);

impl TimeSource for FixedClock {
    fn now(&self) -> Moment {
        self.0
    }
}

/// Converts a UTC instant into weekday + minutes in `zone`.
pub fn moment_in_zone(zone: &Tz, instant: DateTime<Utc>) -> Moment {
    let local = instant.with_timezone(zone);

    let short_name = local.format("%a").to_string();
    let weekday = weekday_from_short_name(&short_name)
        .unwrap_or_else(|| WeekdayCode::from_index(local.weekday().num_days_from_sunday() as usize));

    let minutes = TimeOfDay::from_hm(local.hour() as u16, local.minute() as u16)
        .unwrap_or(TimeOfDay::MIDNIGHT);

    Moment { weekday, minutes }
}

/// Maps a formatted short weekday name back to a code. English (`"Mon"`)
/// and French (`"lun."`) abbreviations are recognized.
pub fn weekday_from_short_name(name: &str) -> Option<WeekdayCode> {
    let name = name.trim().trim_end_matches('.').to_lowercase();
    let day = match name.as_str() {
        "sun" | "dim" => WeekdayCode::Sunday,
        "mon" | "lun" => WeekdayCode::Monday,
        "tue" | "mar" => WeekdayCode::Tuesday,
        "wed" | "mer" => WeekdayCode::Wednesday,
        "thu" | "jeu" => WeekdayCode::Thursday,
        "fri" | "ven" => WeekdayCode::Friday,
        "sat" | "sam" => WeekdayCode::Saturday,
        _ => return None,
    };
    Some(day)
}
