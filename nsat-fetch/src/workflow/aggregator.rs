//! Attendance aggregation
//!
//! Sums attended/total lecture counts per subject across its main and
//! lab offerings. Per-course statistics queries within one kind run
//! concurrently; a failing query contributes zero and never aborts the
//! subject or the run. Output records keep group order and carry a
//! stable index starting at 0 for display assignment.

use crate::types::{CourseApi, CourseStats};
use futures::future::join_all;
use nsat_common::{AttendanceRecord, CourseRecord, SubjectGroup};
use tracing::{debug, warn};

/// Aggregate one attendance record per subject group, in group order
pub async fn aggregate(
    api: &dyn CourseApi,
    token: &str,
    groups: &[SubjectGroup],
) -> Vec<AttendanceRecord> {
    let mut records = Vec::with_capacity(groups.len());

    for (index, group) in groups.iter().enumerate() {
        let (main_attended, main_total) = sum_stats(api, token, &group.subject, &group.main).await;
        let (lab_attended, lab_total) = sum_stats(api, token, &group.subject, &group.lab).await;

        let record = AttendanceRecord::new(
            index,
            group.subject.clone(),
            main_attended,
            main_total,
            lab_attended,
            lab_total,
        );

        debug!(
            subject = %record.subject,
            attended = record.attended,
            total = record.total,
            "Aggregated subject attendance"
        );

        records.push(record);
    }

    records
}

/// Sum (attended, total) across a set of courses
///
/// Queries run concurrently; each failure is logged and counted as
/// zero. Results are folded after completion, so the sums do not
/// depend on completion order.
async fn sum_stats(
    api: &dyn CourseApi,
    token: &str,
    subject: &str,
    courses: &[CourseRecord],
) -> (u32, u32) {
    let queries = courses.iter().map(|course| async move {
        let Some(hash) = course.hash.as_deref() else {
            warn!(
                subject = %subject,
                course = %course.short_display_name,
                "Course has no hash, contributing zero"
            );
            return CourseStats::default();
        };

        match api.course_stats(hash, token).await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(
                    subject = %subject,
                    course = %course.short_display_name,
                    error = %e,
                    "Course stats query failed, contributing zero"
                );
                CourseStats::default()
            }
        }
    });

    join_all(queries)
        .await
        .into_iter()
        .fold((0, 0), |(attended, total), stats| {
            (
                attended + stats.total_lectures_attended,
                total + stats.total_lectures,
            )
        })
}
