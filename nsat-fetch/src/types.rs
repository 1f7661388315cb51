//! Collaborator port definitions
//!
//! The pipeline talks to the outside world only through these traits:
//! credentials, environment hints (open platform contexts), the remote
//! course API, and key/value persistence. Production implementations
//! live in `services/` and `db/`; tests substitute in-memory mocks.

use crate::error::FetchResult;
use async_trait::async_trait;
use nsat_common::{CourseRecord, Snapshot};
use serde::Deserialize;

/// Session credential source
///
/// Fails with `FetchError::NotAuthenticated` when no token is
/// available from any source.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Bearer token for platform API requests
    async fn access_token(&self) -> FetchResult<String>;
}

/// Environment hint source for identifier resolution
///
/// Enumerates locations (URLs) of currently-open application contexts
/// matching the platform domain. An implementation without such a
/// concept returns an empty list and resolution degrades to the
/// enumeration-query strategies. Iteration order is whatever the
/// provider returns; callers must not assume stability.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    /// Locations of open contexts whose URL matches `domain`
    async fn open_locations(&self, domain: &str) -> Vec<String>;
}

/// Per-course statistics as returned by the platform
///
/// Missing fields in an otherwise successful response default to zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CourseStats {
    /// Lectures the student attended in this course
    #[serde(default)]
    pub total_lectures_attended: u32,
    /// Lectures held in this course
    #[serde(default)]
    pub total_lectures: u32,
}

/// Remote course API
///
/// All transport failures surface uniformly as `FetchError::Network`;
/// timeouts are the transport's concern.
#[async_trait]
pub trait CourseApi: Send + Sync {
    /// All learning courses under the given root course identifier
    async fn learning_courses(
        &self,
        course_hash: &str,
        token: &str,
    ) -> FetchResult<Vec<CourseRecord>>;

    /// Raw enrollment payload from one endpoint; shape varies (bare
    /// array, or wrapped under `results` or `data`), the resolver
    /// normalizes it
    async fn enrollment_payload(
        &self,
        endpoint: &str,
        token: &str,
    ) -> FetchResult<serde_json::Value>;

    /// Attendance statistics for one course
    async fn course_stats(&self, course_hash: &str, token: &str) -> FetchResult<CourseStats>;
}

/// Key/value persistence for the identifier cache and the last-known-good
/// attendance snapshot
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Previously resolved course identifier, if any
    async fn course_hash(&self) -> FetchResult<Option<String>>;

    /// Persist a resolved course identifier
    async fn set_course_hash(&self, hash: &str) -> FetchResult<()>;

    /// Drop the cached course identifier
    async fn clear_course_hash(&self) -> FetchResult<()>;

    /// Last successfully persisted snapshot, if any
    async fn snapshot(&self) -> FetchResult<Option<Snapshot>>;

    /// Replace the persisted snapshot
    async fn save_snapshot(&self, snapshot: &Snapshot) -> FetchResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_stats_missing_fields_default_to_zero() {
        let stats: CourseStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.total_lectures_attended, 0);
        assert_eq!(stats.total_lectures, 0);

        let stats: CourseStats =
            serde_json::from_str(r#"{"total_lectures": 12}"#).unwrap();
        assert_eq!(stats.total_lectures_attended, 0);
        assert_eq!(stats.total_lectures, 12);
    }
}
