/// Integration tests against the live agency directory
///
/// These tests verify:
/// 1. The feature service answers and returns GeoJSON
/// 2. Every feature maps to an agency with a schedule
/// 3. Published schedules still decode (format drift detection)
///
/// Prerequisites:
/// - Internet connectivity to reach services6.arcgis.com
///
/// They are marked #[ignore] so normal runs never depend on the network.
/// Run with: cargo test --test directory_integration -- --ignored

use agency_hours::clock::{DEFAULT_TIMEZONE, TimeSource, ZonedClock};
use agency_hours::ingest::arcgis;
use agency_hours::listing;
use agency_hours::verify::{self, VerificationStatus};

fn client() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
}

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_directory_returns_agencies() {
    let collection = arcgis::fetch_feed(&client(), arcgis::DEFAULT_FEED_URL)
        .expect("Agency directory request failed - check network connectivity");

    println!("✓ Directory returned {} features", collection.features.len());
    assert!(!collection.features.is_empty(), "Should receive at least one feature");

    let agencies = arcgis::map_features(&collection, &DEFAULT_TIMEZONE);
    assert!(!agencies.is_empty(), "At least one feature should map to an agency");

    for agency in &agencies {
        assert!(!agency.name.is_empty());
        assert!(agency.latitude.abs() <= 90.0, "{} latitude out of range", agency.name);
        assert!(agency.longitude.abs() <= 180.0, "{} longitude out of range", agency.name);
    }
}

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_live_schedules_still_decode() {
    let collection = arcgis::fetch_feed(&client(), arcgis::DEFAULT_FEED_URL)
        .expect("Agency directory request failed");
    let agencies = arcgis::map_features(&collection, &DEFAULT_TIMEZONE);

    let report = verify::verify_agencies(&agencies);
    verify::print_summary(&report);

    let usable = report
        .results
        .iter()
        .filter(|r| r.status != VerificationStatus::Failed)
        .count();
    assert!(usable > 0, "No agency schedule decodes - provider format may have changed");
}

#[test]
#[ignore] // Don't run in CI - depends on external API
fn test_live_listing_renders() {
    let collection = arcgis::fetch_feed(&client(), arcgis::DEFAULT_FEED_URL)
        .expect("Agency directory request failed");
    let agencies = arcgis::map_features(&collection, &DEFAULT_TIMEZONE);

    let views = listing::build_views(&agencies, ZonedClock::default().now());
    let shown = listing::filter_views(&views, "");
    let text = listing::render_text(&shown);

    println!("{}", text);
    assert_eq!(shown.len(), agencies.len());
    assert!(text.contains("Agence de "));
}
