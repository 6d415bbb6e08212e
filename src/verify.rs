//! Schedule Verification Module
//!
//! Audits every agency in a feed to determine whose published hours decode
//! cleanly, whose decode only partially, and whose are unusable. Run this
//! after a provider change to catch format drift before users see
//! "Horaire indisponible" everywhere.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Agency, ScheduleIssue, WeekdayCode};
use crate::schedule::{DaySchedule, WeeklySchedule};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub results: Vec<ScheduleVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VerificationSummary {
    pub total: usize,
    pub complete: usize,
    pub partial: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleVerification {
    pub name: String,
    pub status: VerificationStatus,
    /// Weekdays with a line in the schedule text.
    pub lines_found: usize,
    pub open_days: Vec<String>,
    pub closed_days: Vec<String>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum VerificationStatus {
    /// All seven days present, no issues.
    Success,
    /// At least one day usable, but something is missing or unparsable.
    PartialSuccess,
    /// No day yields a usable range.
    Failed,
}

// ============================================================================
// Verification
// ============================================================================

pub fn verify_agency(agency: &Agency) -> ScheduleVerification {
    let schedule = WeeklySchedule::decode(&agency.schedule);

    let mut result = ScheduleVerification {
        name: agency.name.clone(),
        status: VerificationStatus::Failed,
        lines_found: 0,
        open_days: Vec::new(),
        closed_days: Vec::new(),
        issues: schedule.issues().iter().map(ScheduleIssue::to_string).collect(),
    };

    for day in WeekdayCode::MONDAY_FIRST {
        match schedule.day(day) {
            DaySchedule::Missing => {}
            DaySchedule::Closed => {
                result.lines_found += 1;
                result.closed_days.push(day.code().to_string());
            }
            DaySchedule::Open(_) => {
                result.lines_found += 1;
                result.open_days.push(day.code().to_string());
            }
        }
    }

    if !result.open_days.is_empty() {
        result.status = if result.issues.is_empty() {
            VerificationStatus::Success
        } else {
            VerificationStatus::PartialSuccess
        };
    }

    result
}

pub fn verify_agencies(agencies: &[Agency]) -> VerificationReport {
    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        results: Vec::with_capacity(agencies.len()),
        summary: VerificationSummary {
            total: agencies.len(),
            ..Default::default()
        },
    };

    for agency in agencies {
        let result = verify_agency(agency);
        match result.status {
            VerificationStatus::Success => report.summary.complete += 1,
            VerificationStatus::PartialSuccess => report.summary.partial += 1,
            VerificationStatus::Failed => report.summary.failed += 1,
        }
        report.results.push(result);
    }

    report
}

pub fn print_summary(report: &VerificationReport) {
    println!("\n═══════════════════════════════════════════════════════════");
    println!("📊 SCHEDULE VERIFICATION");
    println!("═══════════════════════════════════════════════════════════");

    for result in &report.results {
        let mark = match result.status {
            VerificationStatus::Success => "✓",
            VerificationStatus::PartialSuccess => "⚠",
            VerificationStatus::Failed => "✗",
        };
        println!(
            "  {} {} ({}/7 days, open: {})",
            mark,
            result.name,
            result.lines_found,
            if result.open_days.is_empty() { "-".to_string() } else { result.open_days.join(" ") }
        );
        for issue in &result.issues {
            println!("      {}", issue);
        }
    }

    let s = &report.summary;
    let success_rate = if s.total > 0 {
        (s.complete as f64 / s.total as f64) * 100.0
    } else {
        0.0
    };

    println!();
    println!("Complete: {}  Partial: {}  Failed: {}  (total {})", s.complete, s.partial, s.failed, s.total);
    println!("Clean decode rate: {:.1}%", success_rate);
    println!("═══════════════════════════════════════════════════════════");
}
