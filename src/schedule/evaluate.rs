//! Status and next-event computation against a decoded schedule.

use crate::clock::Moment;
use crate::model::{Evaluation, NextEvent, Status, Unavailable, WeekdayCode};
use crate::schedule::parse::{DaySchedule, WeeklySchedule};

/// Days scanned forward when looking for the next open day. Seven so that a
/// once-a-week agency evaluated after closing reports its own weekday.
const SCAN_DAYS: usize = 7;

/// Evaluates `schedule` at `now`.
///
/// When today's ranges are all in the past, the next open weekday is named
/// (same forward scan as a closed day) rather than a generic "tomorrow".
pub fn evaluate(schedule: &WeeklySchedule, now: Moment) -> Evaluation {
    let ranges = match schedule.day(now.weekday) {
        DaySchedule::Missing => return Evaluation::unavailable(),
        DaySchedule::Closed => return Evaluation::closed(next_open_day(schedule, now.weekday)),
        DaySchedule::Open(ranges) => ranges,
    };

    if let Some(current) = ranges.iter().find(|r| r.contains(now.minutes)) {
        return Evaluation {
            status: Status::Open,
            next: NextEvent::ClosesAt(current.end),
        };
    }

    match ranges.iter().find(|r| r.start > now.minutes) {
        Some(upcoming) => Evaluation::closed(NextEvent::OpensAt(upcoming.start)),
        None => Evaluation::closed(next_open_day(schedule, now.weekday)),
    }
}

/// Decodes and evaluates in one step.
pub fn evaluate_text(text: &str, now: Moment) -> Evaluation {
    evaluate(&WeeklySchedule::decode(text), now)
}

/// First day after `today` with at least one usable range.
fn next_open_day(schedule: &WeeklySchedule, today: WeekdayCode) -> NextEvent {
    (1..=SCAN_DAYS)
        .map(|offset| today.plus_days(offset))
        .find(|day| schedule.day(*day).is_open())
        .map(NextEvent::OpensOn)
        .unwrap_or(NextEvent::Unavailable(Unavailable::Hours))
}
