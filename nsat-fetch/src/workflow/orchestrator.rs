//! Fetch pipeline orchestration
//!
//! Sequences credential lookup → identifier resolution → course list
//! fetch → grouping → aggregation → snapshot persistence, and owns the
//! stale-cache fallback policy:
//!
//! - `NotAuthenticated` surfaces immediately, never answered from cache
//! - `ResolutionFailed` / network failure fall back to the last
//!   persisted snapshot when one exists, with a reason
//! - no snapshot means the originating error propagates
//!
//! The orchestrator never retries; a retry is an explicit re-invocation
//! by the caller.

use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};
use crate::types::{ContextProvider, CourseApi, CredentialProvider, SnapshotStore};
use crate::workflow::aggregator::aggregate;
use crate::workflow::grouper::group_courses;
use crate::workflow::resolver::CourseResolver;
use chrono::{DateTime, Utc};
use nsat_common::{AttendanceRecord, Snapshot};
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Why a run served cached data instead of fresh data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The course identifier could not be determined
    ResolutionFailed,
    /// A remote fetch failed after resolution
    FetchFailed,
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::ResolutionFailed => {
                write!(f, "Could not find course. Showing cached data.")
            }
            StaleReason::FetchFailed => write!(f, "Fetch failed. Showing cached data."),
        }
    }
}

/// Result of one pipeline run
///
/// Failure cases are the `Err` arm of `run()`, carrying the
/// originating `FetchError`.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Freshly fetched and persisted records
    Fresh {
        records: Vec<AttendanceRecord>,
        fetched_at: DateTime<Utc>,
    },
    /// Records served from the last persisted snapshot
    Stale {
        records: Vec<AttendanceRecord>,
        fetched_at: DateTime<Utc>,
        reason: StaleReason,
    },
}

/// The full fetch pipeline over injected collaborator ports
pub struct FetchPipeline {
    api: Arc<dyn CourseApi>,
    credentials: Arc<dyn CredentialProvider>,
    contexts: Arc<dyn ContextProvider>,
    store: Arc<dyn SnapshotStore>,
    config: FetchConfig,
    /// Guards against overlapping runs corrupting the identifier cache
    run_gate: Mutex<()>,
}

impl FetchPipeline {
    pub fn new(
        api: Arc<dyn CourseApi>,
        credentials: Arc<dyn CredentialProvider>,
        contexts: Arc<dyn ContextProvider>,
        store: Arc<dyn SnapshotStore>,
        config: FetchConfig,
    ) -> Self {
        Self {
            api,
            credentials,
            contexts,
            store,
            config,
            run_gate: Mutex::new(()),
        }
    }

    /// Run the full pipeline once
    pub async fn run(&self) -> FetchResult<FetchOutcome> {
        let _running = self.run_gate.lock().await;

        // No cache fallback for a missing session: cached data without
        // a valid login is not offered.
        let token = self.credentials.access_token().await?;

        let resolver = CourseResolver::new(
            self.api.as_ref(),
            self.contexts.as_ref(),
            self.store.as_ref(),
            &self.config,
        );
        let course_hash = match resolver.resolve(&token).await {
            Ok(hash) => hash,
            Err(e @ FetchError::ResolutionFailed) => {
                return self.stale_fallback(StaleReason::ResolutionFailed, e).await;
            }
            Err(e) => return Err(e),
        };

        let courses = match self.api.learning_courses(&course_hash, &token).await {
            Ok(courses) => courses,
            Err(e @ FetchError::Network(_)) => {
                return self.stale_fallback(StaleReason::FetchFailed, e).await;
            }
            Err(e) => return Err(e),
        };

        let groups = group_courses(&courses, &self.config.org_marker);
        let records = aggregate(self.api.as_ref(), &token, &groups).await;

        let snapshot = Snapshot {
            records: records.clone(),
            fetched_at: Utc::now(),
        };
        if let Err(e) = self.store.save_snapshot(&snapshot).await {
            warn!(error = %e, "Failed to persist attendance snapshot");
        }

        info!(subjects = records.len(), "Attendance fetch complete");

        Ok(FetchOutcome::Fresh {
            records,
            fetched_at: snapshot.fetched_at,
        })
    }

    /// Last persisted snapshot, for cache-only display
    pub async fn cached(&self) -> FetchResult<Snapshot> {
        self.store
            .snapshot()
            .await?
            .ok_or(FetchError::NoCachedData)
    }

    /// Serve the persisted snapshot, or propagate the originating error
    async fn stale_fallback(
        &self,
        reason: StaleReason,
        source: FetchError,
    ) -> FetchResult<FetchOutcome> {
        match self.store.snapshot().await {
            Ok(Some(snapshot)) => {
                warn!(reason = %reason, error = %source, "Serving cached attendance data");
                Ok(FetchOutcome::Stale {
                    records: snapshot.records,
                    fetched_at: snapshot.fetched_at,
                    reason,
                })
            }
            Ok(None) => Err(source),
            Err(e) => {
                warn!(error = %e, "Snapshot read failed during fallback");
                Err(source)
            }
        }
    }
}
