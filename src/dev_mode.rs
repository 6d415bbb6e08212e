//! Development mode utilities for working without the live directory
//!
//! When the feature service is unavailable, or when checking how the
//! listing looks at a particular time of the week, use this module to
//! replay a saved GeoJSON feed and pin the evaluation clock.

use chrono_tz::Tz;
use std::path::{Path, PathBuf};

use crate::clock::{FixedClock, Moment, TimeSource, ZonedClock};
use crate::ingest::arcgis::{self, FeatureCollection};
use crate::model::{IngestError, TimeOfDay, WeekdayCode};

/// Configuration for development mode replay
#[derive(Debug, Clone, Default)]
pub struct DevMode {
    /// Read the feed from this file instead of the API
    pub fixture: Option<PathBuf>,
    /// Evaluate as if it were this moment
    pub pinned: Option<Moment>,
}

impl DevMode {
    pub fn is_active(&self) -> bool {
        self.fixture.is_some() || self.pinned.is_some()
    }

    /// The clock evaluations should use: pinned if set, otherwise the
    /// wall clock in `zone`.
    pub fn clock(&self, zone: Tz) -> Box<dyn TimeSource> {
        match self.pinned {
            Some(moment) => Box::new(FixedClock(moment)),
            None => Box::new(ZonedClock::new(zone)),
        }
    }
}

/// Reads a saved GeoJSON feed from disk.
pub fn load_fixture(path: &Path) -> Result<FeatureCollection, IngestError> {
    let body = std::fs::read_to_string(path)
        .map_err(|e| IngestError::Io(format!("{}: {}", path.display(), e)))?;
    arcgis::parse_feed(&body)
}

/// Parses a pinned moment from a day code and `HH:MM`, e.g. `("LU", "10:00")`.
pub fn parse_moment(day: &str, time: &str) -> Option<Moment> {
    let weekday = WeekdayCode::from_code(day)?;
    let (h, m) = time.trim().split_once(':')?;
    let minutes = TimeOfDay::from_hm(h.parse().ok()?, m.parse().ok()?)?;
    Some(Moment::new(weekday, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::DEFAULT_TIMEZONE;

    #[test]
    fn test_parse_moment() {
        let moment = parse_moment("ve", "07:00").unwrap();
        assert_eq!(moment.weekday, WeekdayCode::Friday);
        assert_eq!(moment.minutes.minutes(), 420);
        assert!(parse_moment("XX", "07:00").is_none());
        assert!(parse_moment("VE", "7h").is_none());
        assert!(parse_moment("VE", "24:00").is_none());
    }

    #[test]
    fn test_pinned_clock_is_used() {
        let moment = parse_moment("SA", "13:00").unwrap();
        let dev = DevMode { fixture: None, pinned: Some(moment) };
        assert!(dev.is_active());
        assert_eq!(dev.clock(DEFAULT_TIMEZONE).now(), moment);
    }

    #[test]
    fn test_inactive_by_default() {
        assert!(!DevMode::default().is_active());
    }

    #[test]
    fn test_missing_fixture_is_io_error() {
        let err = load_fixture(Path::new("/nonexistent/feed.geojson")).unwrap_err();
        assert!(matches!(err, IngestError::Io(_)));
    }
}
