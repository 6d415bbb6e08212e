/// End-to-end pipeline tests against a saved directory feed
///
/// Feed → map → normalize → decode → evaluate → view → filter, using the
/// GeoJSON fixture in `tests/fixtures/` and a pinned clock. No network.
///
/// Run with: cargo test --test feed_pipeline

use std::path::Path;

use agency_hours::clock::{DEFAULT_TIMEZONE, Moment};
use agency_hours::dev_mode;
use agency_hours::ingest::arcgis;
use agency_hours::listing::{self, AgencyView};
use agency_hours::model::{Agency, TimeOfDay, WeekdayCode};
use agency_hours::verify::{self, VerificationStatus};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/agences.geojson");

fn load_agencies() -> Vec<Agency> {
    let collection = dev_mode::load_fixture(Path::new(FIXTURE)).expect("fixture should parse");
    arcgis::map_features(&collection, &DEFAULT_TIMEZONE)
}

fn views_at(day: WeekdayCode, h: u16, m: u16) -> Vec<AgencyView> {
    let now = Moment::new(day, TimeOfDay::from_hm(h, m).unwrap());
    listing::build_views(&load_agencies(), now)
}

fn view<'a>(views: &'a [AgencyView], name: &str) -> &'a AgencyView {
    views
        .iter()
        .find(|v| v.name == name)
        .unwrap_or_else(|| panic!("no view for '{}'", name))
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

#[test]
fn test_fixture_maps_every_located_agency() {
    let agencies = load_agencies();
    let names: Vec<_> = agencies.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Nouméa Centre", "Païta", "Koné", "Bourail"]);
}

#[test]
fn test_numeric_attributes_become_text() {
    let agencies = load_agencies();
    let paita = agencies.iter().find(|a| a.name == "Païta").unwrap();
    assert_eq!(paita.phone, "353535");
    assert_eq!(paita.postal_code, "98890");
    assert_eq!(paita.fax, "");
}

#[test]
fn test_crlf_schedule_is_normalized() {
    let agencies = load_agencies();
    let paita = agencies.iter().find(|a| a.name == "Païta").unwrap();
    assert!(!paita.schedule.contains('\r'));
    assert_eq!(paita.schedule.lines().count(), 7);
}

#[test]
fn test_structured_schedule_is_normalized_monday_first() {
    let agencies = load_agencies();
    let kone = agencies.iter().find(|a| a.name == "Koné").unwrap();
    assert_eq!(
        kone.schedule,
        "LU : 07:30-15:30\n\
         MA : 07:30-11:30/12:30-15:30\n\
         ME : 07:30-11:30\n\
         JE : 12:30-15:30\n\
         VE : Fermé\n\
         SA : Fermé\n\
         DI : Fermé"
    );
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

#[test]
fn test_monday_morning_statuses() {
    let views = views_at(WeekdayCode::Monday, 10, 0);

    let centre = view(&views, "Nouméa Centre");
    assert!(centre.is_open);
    assert_eq!(centre.next, "Ferme à 15h30");

    let paita = view(&views, "Païta");
    assert!(paita.is_open);
    assert_eq!(paita.next, "Ferme à 11h30");

    let kone = view(&views, "Koné");
    assert!(kone.is_open);
    assert_eq!(kone.next, "Ferme à 15h30");

    let bourail = view(&views, "Bourail");
    assert!(!bourail.is_open);
    assert_eq!(bourail.status, "Fermé");
    assert_eq!(bourail.next, "Horaire indisponible");
}

#[test]
fn test_lunch_break_and_closed_day() {
    let views = views_at(WeekdayCode::Tuesday, 12, 0);

    assert_eq!(view(&views, "Nouméa Centre").next, "Ouvre mercredi");
    assert_eq!(view(&views, "Païta").next, "Ouvre à 12h30");
    assert_eq!(view(&views, "Koné").next, "Ouvre à 12h30");
}

#[test]
fn test_friday_evening_scans_over_weekend() {
    let views = views_at(WeekdayCode::Friday, 18, 0);

    // Centre opens Saturday morning; Païta is closed all weekend
    assert_eq!(view(&views, "Nouméa Centre").next, "Ouvre samedi");
    assert_eq!(view(&views, "Païta").next, "Ouvre lundi");
    assert_eq!(view(&views, "Koné").next, "Ouvre lundi");
}

#[test]
fn test_schedule_table_rows() {
    let views = views_at(WeekdayCode::Monday, 10, 0);
    let rows = &view(&views, "Païta").schedule;
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].day, "LU");
    assert_eq!(rows[0].hours, "08:00-11:30/12:30-15:00");
    assert_eq!(rows[5].hours, "FERMÉ");
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn test_search_matches_without_accents() {
    let views = views_at(WeekdayCode::Monday, 10, 0);

    let hits = listing::filter_views(&views, "noumea");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Nouméa Centre");

    let hits = listing::filter_views(&views, "ECOLES");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Païta");

    assert_eq!(listing::filter_views(&views, "").len(), 4);
}

#[test]
fn test_json_listing_round_trips_through_serde() {
    let views = views_at(WeekdayCode::Monday, 10, 0);
    let shown = listing::filter_views(&views, "kone");
    let json: serde_json::Value = serde_json::from_str(&listing::render_json(&shown).unwrap()).unwrap();

    assert_eq!(json.as_array().map(Vec::len), Some(1));
    assert_eq!(json[0]["status"], "Ouvert");
    assert_eq!(json[0]["schedule"][0]["hours"], "07:30-15:30");
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

#[test]
fn test_verification_report_over_fixture() {
    let report = verify::verify_agencies(&load_agencies());
    assert_eq!(report.summary.total, 4);

    let status = |name: &str| {
        report
            .results
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.status.clone())
    };
    assert_eq!(status("Nouméa Centre"), Some(VerificationStatus::Success));
    assert_eq!(status("Koné"), Some(VerificationStatus::Success));
    assert_eq!(status("Bourail"), Some(VerificationStatus::Failed));
}
