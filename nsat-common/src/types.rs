//! Domain types for attendance tracking
//!
//! Course records arrive from the platform API, get grouped into
//! subjects (theory vs. lab/tutorial offerings), and are aggregated
//! into one `AttendanceRecord` per subject.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Markers in a course short name that identify a lab/tutorial offering
const LAB_MARKERS: [&str; 2] = ["Lab", "Tut"];

/// Subject color palette, assigned by record index mod palette size
///
/// Assignment is deterministic and cycles once the subject count
/// exceeds the palette size; two subjects may share a color.
pub const SUBJECT_PALETTE: [&str; 10] = [
    "blue", "green", "purple", "red", "yellow", "pink", "orange", "teal", "indigo", "cyan",
];

/// Color for a given record index (cycling)
pub fn palette_color(index: usize) -> &'static str {
    SUBJECT_PALETTE[index % SUBJECT_PALETTE.len()]
}

/// One course offering as returned by the platform API
///
/// Immutable once received. The `hash` is the opaque identifier used
/// for per-course queries; entries without one cannot be queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Opaque course identifier used in per-course API paths
    #[serde(default)]
    pub hash: Option<String>,
    /// Full course title, used to filter organization membership
    #[serde(default)]
    pub title: String,
    /// Short name encoding subject prefix and kind, e.g. "CS101 Lab"
    #[serde(default)]
    pub short_display_name: String,
}

impl CourseRecord {
    /// First whitespace-delimited token of the short name, e.g. "CS101"
    pub fn subject_prefix(&self) -> Option<&str> {
        self.short_display_name.split_whitespace().next()
    }

    /// Whether the short name carries a lab/tutorial marker
    pub fn is_lab_or_tut(&self) -> bool {
        LAB_MARKERS
            .iter()
            .any(|m| self.short_display_name.contains(m))
    }
}

/// Courses of one subject, split into theory and lab/tutorial offerings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectGroup {
    /// Subject key (shared course prefix, e.g. "CS101")
    pub subject: String,
    /// Theory offerings: prefix matches, no lab/tutorial marker
    pub main: Vec<CourseRecord>,
    /// Lab/tutorial offerings containing the subject key
    pub lab: Vec<CourseRecord>,
}

/// Aggregated attendance for one subject
///
/// A value, created once per pipeline run; `total == 0` is valid and
/// displays as 0% by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Stable index assigned in group order, starting at 0.
    /// Used only for deterministic color/display assignment.
    pub id: usize,
    /// Subject key this record aggregates
    pub subject: String,
    /// Lectures attended across theory offerings
    pub main_attended: u32,
    /// Lectures held across theory offerings
    pub main_total: u32,
    /// Lectures attended across lab/tutorial offerings
    pub lab_attended: u32,
    /// Lectures held across lab/tutorial offerings
    pub lab_total: u32,
    /// main_attended + lab_attended
    pub attended: u32,
    /// main_total + lab_total
    pub total: u32,
}

impl AttendanceRecord {
    /// Build a record from per-kind counts, deriving the combined totals
    pub fn new(
        id: usize,
        subject: String,
        main_attended: u32,
        main_total: u32,
        lab_attended: u32,
        lab_total: u32,
    ) -> Self {
        Self {
            id,
            subject,
            main_attended,
            main_total,
            lab_attended,
            lab_total,
            attended: main_attended + lab_attended,
            total: main_total + lab_total,
        }
    }

    /// Attendance percentage rounded to the nearest integer (0 when no lectures)
    pub fn percent(&self) -> u32 {
        percent(self.attended, self.total)
    }

    /// Display color for this record (index mod palette size)
    pub fn color(&self) -> &'static str {
        palette_color(self.id)
    }

    /// Status band for this record's percentage
    pub fn status(&self) -> AttendanceStatus {
        AttendanceStatus::from_percent(self.percent())
    }
}

/// Attendance percentage rounded to the nearest integer (0 when total is 0)
pub fn percent(attended: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (f64::from(attended) / f64::from(total) * 100.0).round() as u32
    }
}

/// Display band for an attendance percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// 85% and above
    Excellent,
    /// 75% to 84%
    Good,
    /// 65% to 74%
    Average,
    /// Below 65%
    Poor,
}

impl AttendanceStatus {
    /// Band for a rounded percentage value
    pub fn from_percent(percent: u32) -> Self {
        match percent {
            85.. => Self::Excellent,
            75..=84 => Self::Good,
            65..=74 => Self::Average,
            _ => Self::Poor,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

/// Last successfully fetched attendance data plus its timestamp
///
/// Persisted after every fresh pipeline run and served as stale data
/// when a later run fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// One record per subject, in group order
    pub records: Vec<AttendanceRecord>,
    /// When the records were fetched
    pub fetched_at: DateTime<Utc>,
}

// ============================================================================
// Tests
// ============================================================================
