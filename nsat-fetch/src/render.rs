//! Terminal rendering of attendance records
//!
//! Thin presentation layer over the aggregated records: per-subject
//! lines with percentage, status band and 75% projection, an overall
//! summary, and a staleness banner when cached data is shown. Colors
//! follow each record's palette assignment.

use crate::workflow::StaleReason;
use chrono::{DateTime, Utc};
use nsat_common::projection::{required_for_default_target, Projection};
use nsat_common::types::percent;
use nsat_common::{AttendanceRecord, AttendanceStatus};
use owo_colors::{OwoColorize, Style};
use std::fmt::Write;

/// Display style for a palette color name
fn palette_style(name: &str) -> Style {
    let style = Style::new();
    match name {
        "blue" => style.blue(),
        "green" => style.green(),
        "purple" => style.magenta(),
        "red" => style.red(),
        "yellow" => style.yellow(),
        "pink" => style.bright_magenta(),
        "orange" => style.bright_red(),
        "teal" => style.cyan(),
        "indigo" => style.bright_blue(),
        "cyan" => style.bright_cyan(),
        _ => style.white(),
    }
}

/// One-line summary of a projection against the 75% target
pub fn projection_line(projection: &Projection) -> String {
    if projection.already_at_target {
        format!("at/above 75%, can miss {}", projection.can_miss)
    } else {
        format!(
            "attend {} more to reach 75% ({}/{})",
            projection.classes_to_attend, projection.new_attended, projection.new_total
        )
    }
}

/// Render the full dashboard
///
/// `stale` carries the reason and original fetch time when cached data
/// is being shown.
pub fn render_dashboard(
    records: &[AttendanceRecord],
    fetched_at: DateTime<Utc>,
    stale: Option<StaleReason>,
) -> String {
    let mut out = String::new();

    if let Some(reason) = stale {
        let banner = format!(
            "! {} (fetched {})",
            reason,
            fetched_at.format("%Y-%m-%d %H:%M UTC")
        );
        let _ = writeln!(out, "{}", banner.yellow());
        let _ = writeln!(out);
    }

    if records.is_empty() {
        let _ = writeln!(out, "No subjects found.");
        return out;
    }

    for record in records {
        let projection = required_for_default_target(record.attended, record.total);
        let subject_style = palette_style(record.color()).bold();

        // Pad before styling so escape codes stay out of the width
        let subject = format!("{:<8}", record.subject);
        let _ = writeln!(
            out,
            "{} {:>3}/{:<3} {:>3}%  {:<9} {}",
            subject.style(subject_style),
            record.attended,
            record.total,
            record.percent(),
            record.status().label(),
            projection_line(&projection),
        );

        let detail = format!(
            "         main {}/{} ({}%)  lab {}/{} ({}%)",
            record.main_attended,
            record.main_total,
            percent(record.main_attended, record.main_total),
            record.lab_attended,
            record.lab_total,
            percent(record.lab_attended, record.lab_total),
        );
        let _ = writeln!(out, "{}", detail.dimmed());
    }

    let attended: u32 = records.iter().map(|r| r.attended).sum();
    let total: u32 = records.iter().map(|r| r.total).sum();
    let overall = required_for_default_target(attended, total);

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}  {:>3}/{:<3} {:>3}%  {:<9} {}",
        "Overall".bold(),
        attended,
        total,
        percent(attended, total),
        AttendanceStatus::from_percent(percent(attended, total)).label(),
        projection_line(&overall),
    );

    out
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_line_at_target() {
        let p = required_for_default_target(58, 75);
        assert_eq!(projection_line(&p), "at/above 75%, can miss 2");
    }

    #[test]
    fn test_projection_line_below_target() {
        let p = required_for_default_target(30, 50);
        assert_eq!(
            projection_line(&p),
            "attend 30 more to reach 75% (60/80)"
        );
    }

    #[test]
    fn test_dashboard_contains_overall_and_banner() {
        let records = vec![AttendanceRecord::new(0, "CS101".into(), 40, 50, 18, 25)];

        let fresh = render_dashboard(&records, Utc::now(), None);
        assert!(fresh.contains("CS101"));
        assert!(fresh.contains("Overall"));
        assert!(!fresh.contains("cached data"));

        let stale = render_dashboard(&records, Utc::now(), Some(StaleReason::FetchFailed));
        assert!(stale.contains("Fetch failed. Showing cached data."));
    }

    #[test]
    fn test_subject_line_carries_palette_style() {
        // Record 0 takes the first palette color
        let records = vec![AttendanceRecord::new(0, "CS101".into(), 40, 50, 18, 25)];
        let out = render_dashboard(&records, Utc::now(), None);

        let styled = format!("{:<8}", "CS101")
            .style(palette_style("blue").bold())
            .to_string();
        assert!(out.contains(&styled));
    }

    #[test]
    fn test_dashboard_empty() {
        let out = render_dashboard(&[], Utc::now(), None);
        assert!(out.contains("No subjects found."));
    }
}
