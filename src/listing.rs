//! Immutable view records for the agency listing.
//!
//! The pipeline is `Agency` → decode → evaluate → `AgencyView`. Views carry
//! only display-ready text; rendering never reaches back into ingestion.

use serde::Serialize;

use crate::clock::Moment;
use crate::logging::{self, LogSource};
use crate::model::{Agency, CLOSED_MARKER, Status, WeekdayCode};
use crate::schedule::text::fold;
use crate::schedule::{WeeklySchedule, evaluate};

/// One row of an agency's hours table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub day: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyView {
    pub name: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub phone: String,
    pub fax: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_open: bool,
    /// `"Ouvert"` or `"Fermé"`
    pub status: String,
    /// Next-event text, e.g. `"Ferme à 15h30"`
    pub next: String,
    pub schedule: Vec<ScheduleRow>,
}

/// Evaluates every agency at `now`. Each agency is decoded and evaluated
/// on its own; schedule issues are logged at debug level.
pub fn build_views(agencies: &[Agency], now: Moment) -> Vec<AgencyView> {
    agencies
        .iter()
        .map(|agency| {
            let schedule = WeeklySchedule::decode(&agency.schedule);
            for issue in schedule.issues() {
                logging::debug(LogSource::Schedule, Some(&agency.name), &issue.to_string());
            }
            let evaluation = evaluate(&schedule, now);

            AgencyView {
                name: agency.name.clone(),
                address: agency.address.clone(),
                postal_code: agency.postal_code.clone(),
                city: agency.city.clone(),
                phone: agency.phone.clone(),
                fax: agency.fax.clone(),
                latitude: agency.latitude,
                longitude: agency.longitude,
                is_open: evaluation.status == Status::Open,
                status: evaluation.status.label().to_string(),
                next: evaluation.next.to_string(),
                schedule: schedule_rows(&agency.schedule),
            }
        })
        .collect()
}

/// Splits canonical text into table rows. A line without hours shows the
/// closed-marker; lines that carry no weekday prefix are kept as-is so the
/// table still shows what the provider published.
pub fn schedule_rows(text: &str) -> Vec<ScheduleRow> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (day, hours) = match line.split_once(':') {
                Some((prefix, hours)) => {
                    let day = WeekdayCode::from_code(prefix)
                        .map(|d| d.code().to_string())
                        .unwrap_or_else(|| prefix.trim().to_string());
                    (day, hours.trim())
                }
                None => (line.to_string(), ""),
            };
            let hours = if hours.is_empty() { CLOSED_MARKER } else { hours };
            ScheduleRow {
                day,
                hours: hours.to_string(),
            }
        })
        .collect()
}

/// Accent- and case-insensitive search over name, city and address. An
/// empty query matches everything.
pub fn filter_views<'a>(views: &'a [AgencyView], query: &str) -> Vec<&'a AgencyView> {
    let needle = fold(query.trim());
    views
        .iter()
        .filter(|v| {
            needle.is_empty()
                || fold(&v.name).contains(&needle)
                || fold(&v.city).contains(&needle)
                || fold(&v.address).contains(&needle)
        })
        .collect()
}

/// Plain-text listing: one block per agency with its hours table.
pub fn render_text(views: &[&AgencyView]) -> String {
    let mut out = String::new();

    for view in views {
        out.push_str(&format!("Agence de {}\n", view.name));
        out.push_str(&format!("  Adresse : {}\n", view.address));
        out.push_str(&format!("  Code Postal : {} - {}\n", view.postal_code, view.city));
        if !view.phone.is_empty() {
            out.push_str(&format!("  Téléphone : {}\n", view.phone));
        }
        if !view.fax.is_empty() {
            out.push_str(&format!("  Fax : {}\n", view.fax));
        }
        out.push_str(&format!("  {} • {}\n", view.status, view.next));
        for row in &view.schedule {
            out.push_str(&format!("    {:<4}{}\n", row.day, row.hours));
        }
        out.push('\n');
    }

    out
}

pub fn render_json(views: &[&AgencyView]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(views)
}
