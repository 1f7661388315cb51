//! Course grouping by subject prefix
//!
//! Partitions the organization's courses into subject buckets, each
//! split into theory ("main") and lab/tutorial offerings. Subject keys
//! are the first whitespace token of the short name, in first-seen
//! order.

use nsat_common::{CourseRecord, SubjectGroup};
use tracing::debug;

/// Group courses into subjects
///
/// Only records whose title contains `org_marker` participate. For
/// each subject key, `main` holds records whose first token equals the
/// key and carry no lab/tutorial marker; `lab` holds records with a
/// lab/tutorial marker whose short name contains the key anywhere.
/// The lab match is intentionally looser, so a lab section groups with
/// its subject even when its own first token differs.
///
/// An input with no organization-matching records yields an empty list.
pub fn group_courses(courses: &[CourseRecord], org_marker: &str) -> Vec<SubjectGroup> {
    let org_courses: Vec<&CourseRecord> = courses
        .iter()
        .filter(|c| c.title.contains(org_marker))
        .collect();

    // Distinct first tokens in first-seen order
    let mut subjects: Vec<&str> = Vec::new();
    for course in &org_courses {
        if let Some(prefix) = course.subject_prefix() {
            if !subjects.contains(&prefix) {
                subjects.push(prefix);
            }
        }
    }

    let groups: Vec<SubjectGroup> = subjects
        .into_iter()
        .map(|subject| {
            let main = org_courses
                .iter()
                .filter(|c| c.subject_prefix() == Some(subject) && !c.is_lab_or_tut())
                .map(|c| (*c).clone())
                .collect();

            let lab = org_courses
                .iter()
                .filter(|c| c.is_lab_or_tut() && c.short_display_name.contains(subject))
                .map(|c| (*c).clone())
                .collect();

            SubjectGroup {
                subject: subject.to_string(),
                main,
                lab,
            }
        })
        .collect();

    debug!(
        courses = courses.len(),
        org_courses = org_courses.len(),
        subjects = groups.len(),
        "Grouped courses by subject"
    );

    groups
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ORG: &str = "Newton School of Technology";

    fn course(title: &str, short: &str) -> CourseRecord {
        CourseRecord {
            hash: Some(format!("hash-{}", short.replace(' ', "-"))),
            title: title.into(),
            short_display_name: short.into(),
        }
    }

    fn org_course(short: &str) -> CourseRecord {
        course("Newton School of Technology Semester 1", short)
    }

    #[test]
    fn test_splits_main_and_lab() {
        let courses = vec![
            org_course("CS101 Lecture"),
            org_course("CS101 Lab"),
            org_course("CS101 Tut"),
        ];

        let groups = group_courses(&courses, ORG);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].subject, "CS101");
        assert_eq!(groups[0].main.len(), 1);
        assert_eq!(groups[0].lab.len(), 2);
    }

    #[test]
    fn test_non_org_courses_are_filtered() {
        let courses = vec![
            org_course("CS101 Lecture"),
            course("Some Other Program", "XX900 Lecture"),
        ];

        let groups = group_courses(&courses, ORG);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].subject, "CS101");
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        assert!(group_courses(&[], ORG).is_empty());

        let only_foreign = vec![course("Another Program", "YY100")];
        assert!(group_courses(&only_foreign, ORG).is_empty());
    }

    #[test]
    fn test_first_seen_key_order() {
        let courses = vec![
            org_course("MA102 Lecture"),
            org_course("CS101 Lecture"),
            org_course("MA102 Lab"),
            org_course("PH103 Lecture"),
        ];

        let groups = group_courses(&courses, ORG);
        let keys: Vec<&str> = groups.iter().map(|g| g.subject.as_str()).collect();
        assert_eq!(keys, vec!["MA102", "CS101", "PH103"]);
    }

    #[test]
    fn test_lab_matches_key_as_substring() {
        // Lab section whose first token differs from the subject key
        // still groups by the contained prefix.
        let courses = vec![
            org_course("CS101 Lecture"),
            org_course("Sec-A CS101 Lab"),
        ];

        let groups = group_courses(&courses, ORG);
        let cs101 = groups.iter().find(|g| g.subject == "CS101").unwrap();
        assert_eq!(cs101.lab.len(), 1);
        assert_eq!(cs101.lab[0].short_display_name, "Sec-A CS101 Lab");
    }

    #[test]
    fn test_every_org_course_lands_in_exactly_one_bucket() {
        let courses = vec![
            org_course("CS101 Lecture"),
            org_course("CS101 Lab"),
            org_course("MA102 Lecture"),
            org_course("MA102 Tut"),
            org_course("PH103 Lecture"),
        ];

        let groups = group_courses(&courses, ORG);

        for course in &courses {
            let placements: usize = groups
                .iter()
                .map(|g| {
                    g.main
                        .iter()
                        .chain(g.lab.iter())
                        .filter(|c| c.short_display_name == course.short_display_name)
                        .count()
                })
                .sum();
            assert_eq!(
                placements, 1,
                "{} should appear exactly once",
                course.short_display_name
            );
        }
    }
}
