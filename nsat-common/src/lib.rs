//! # NSAT Common Library
//!
//! Shared code for the NSAT attendance tracker:
//! - Domain types (course records, subject groups, attendance records)
//! - Attendance target projection math
//! - Configuration loading and root folder resolution
//! - Common error types

pub mod config;
pub mod error;
pub mod projection;
pub mod types;

pub use error::{Error, Result};
pub use projection::{Projection, DEFAULT_TARGET_RATIO};
pub use types::{AttendanceRecord, AttendanceStatus, CourseRecord, Snapshot, SubjectGroup};
