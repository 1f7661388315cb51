//! Attendance target projection math
//!
//! Given an (attended, total) pair and a target ratio, computes either
//! how many future classes can be missed while staying at or above the
//! target, or the minimum number of classes (all attended) needed to
//! reach it.
//!
//! Closed forms, for target ratio `r`:
//! - at/above target: max X with attended / (total + X) >= r, i.e.
//!   X = floor((attended - r*total) / r)
//! - below target: min X with (attended + X) / (total + X) >= r, i.e.
//!   X = ceil((r*total - attended) / (1 - r))
//!   (for r = 0.75 this is ceil(3*total - 4*attended))
//!
//! Pure functions, reused identically for per-kind (main/lab),
//! per-subject and overall projections.

use serde::Serialize;

/// Attendance fraction threshold used when no explicit target is given
pub const DEFAULT_TARGET_RATIO: f64 = 0.75;

/// Result of a target projection for one (attended, total) pair
///
/// Recomputed on demand; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Classes to attend (all of them) to reach the target; 0 when
    /// already at or above it
    pub classes_to_attend: u32,
    /// Attended count after attending `classes_to_attend` more
    pub new_attended: u32,
    /// Total count after attending `classes_to_attend` more
    pub new_total: u32,
    /// Classes that can be missed while staying at or above the
    /// target; 0 when below it
    pub can_miss: u32,
    /// Whether the current ratio already meets the target
    pub already_at_target: bool,
}

/// Project attendance against the default 75% target
pub fn required_for_default_target(attended: u32, total: u32) -> Projection {
    required_for_target(attended, total, DEFAULT_TARGET_RATIO)
}

/// Project attendance against an arbitrary target ratio
///
/// `total == 0` counts as vacuously at target. Callers are expected to
/// pass `attended <= total`; behavior is unspecified otherwise. The
/// target ratio must lie strictly between 0 and 1.
pub fn required_for_target(attended: u32, total: u32, target: f64) -> Projection {
    debug_assert!(target > 0.0 && target < 1.0, "target ratio out of range");

    let attended_f = f64::from(attended);
    let total_f = f64::from(total);

    let at_target = total == 0 || attended_f / total_f >= target;

    if at_target {
        let can_miss = ((attended_f - target * total_f) / target).floor().max(0.0) as u32;
        return Projection {
            classes_to_attend: 0,
            new_attended: attended,
            new_total: total,
            can_miss,
            already_at_target: true,
        };
    }

    let to_attend = ((target * total_f - attended_f) / (1.0 - target))
        .ceil()
        .max(0.0) as u32;

    Projection {
        classes_to_attend: to_attend,
        new_attended: attended + to_attend,
        new_total: total + to_attend,
        can_miss: 0,
        already_at_target: false,
    }
}

// ============================================================================
// Tests
// ============================================================================
