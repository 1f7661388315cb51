//! Course identifier resolution
//!
//! Determines the enrolling organization's root course hash through an
//! ordered list of fallback strategies, each tried only if the
//! previous one yielded nothing:
//!
//! 1. Cached hash from the snapshot store
//! 2. Open platform contexts with a `/course/{hash}/` path segment
//! 3. Primary enrollment query
//! 4. Alternate enrollment endpoints, in order
//!
//! A success from strategies 2-4 persists the hash so the cache
//! short-circuits on the next run. Failures inside one strategy are
//! logged and absorbed; only full exhaustion errors out.

use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult};
use crate::services::api_client::normalize_course_payload;
use crate::types::{ContextProvider, CourseApi, SnapshotStore};
use tracing::{debug, info, warn};

/// One resolution strategy in the fallback chain
enum Strategy<'a> {
    CachedHash,
    OpenContexts,
    Enrollment(&'a str),
}

impl Strategy<'_> {
    fn name(&self) -> String {
        match self {
            Strategy::CachedHash => "cached hash".into(),
            Strategy::OpenContexts => "open contexts".into(),
            Strategy::Enrollment(endpoint) => format!("enrollment query {}", endpoint),
        }
    }
}

/// Identifier resolver over the collaborator ports
pub struct CourseResolver<'a> {
    api: &'a dyn CourseApi,
    contexts: &'a dyn ContextProvider,
    store: &'a dyn SnapshotStore,
    config: &'a FetchConfig,
}

impl<'a> CourseResolver<'a> {
    pub fn new(
        api: &'a dyn CourseApi,
        contexts: &'a dyn ContextProvider,
        store: &'a dyn SnapshotStore,
        config: &'a FetchConfig,
    ) -> Self {
        Self {
            api,
            contexts,
            store,
            config,
        }
    }

    /// Resolve the root course hash, trying each strategy in order
    ///
    /// Fails with `ResolutionFailed` only after every strategy is
    /// exhausted. Never mutates anything except the identifier cache.
    pub async fn resolve(&self, token: &str) -> FetchResult<String> {
        let mut strategies = vec![Strategy::CachedHash, Strategy::OpenContexts];
        strategies.extend(
            self.config
                .enrollment_endpoints
                .iter()
                .map(|e| Strategy::Enrollment(e)),
        );

        for strategy in &strategies {
            let found = match strategy {
                Strategy::CachedHash => self.cached_hash().await,
                Strategy::OpenContexts => self.hash_from_contexts().await,
                Strategy::Enrollment(endpoint) => self.hash_from_enrollment(endpoint, token).await,
            };

            if let Some(hash) = found {
                info!(strategy = %strategy.name(), hash = %hash, "Resolved course hash");

                // Cache hits are already persisted
                if !matches!(strategy, Strategy::CachedHash) {
                    if let Err(e) = self.store.set_course_hash(&hash).await {
                        warn!(error = %e, "Failed to persist resolved course hash");
                    }
                }

                return Ok(hash);
            }

            debug!(strategy = %strategy.name(), "Strategy yielded nothing");
        }

        Err(FetchError::ResolutionFailed)
    }

    /// Strategy 1: previously persisted hash
    async fn cached_hash(&self) -> Option<String> {
        match self.store.course_hash().await {
            Ok(hash) => hash,
            Err(e) => {
                warn!(error = %e, "Could not read cached course hash");
                None
            }
        }
    }

    /// Strategy 2: extract from an open platform context URL
    async fn hash_from_contexts(&self) -> Option<String> {
        let locations = self
            .contexts
            .open_locations(&self.config.platform_domain)
            .await;

        locations
            .iter()
            .find_map(|loc| extract_course_segment(loc).map(str::to_string))
    }

    /// Strategies 3/4: search an enrollment payload for an organization course
    async fn hash_from_enrollment(&self, endpoint: &str, token: &str) -> Option<String> {
        let payload = match self.api.enrollment_payload(endpoint, token).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(endpoint = %endpoint, error = %e, "Enrollment query failed");
                return None;
            }
        };

        let courses = normalize_course_payload(&payload)?;

        courses
            .into_iter()
            .find(|c| c.title.contains(&self.config.org_marker) && c.hash.is_some())
            .and_then(|c| c.hash)
    }
}

/// Extract `{hash}` from a `.../course/{hash}/...` location
///
/// Returns None when the path has no `course` segment or nothing
/// follows it.
pub fn extract_course_segment(location: &str) -> Option<&str> {
    let mut parts = location.split('/');
    while let Some(part) = parts.next() {
        if part == "course" {
            return parts.next().filter(|hash| !hash.is_empty());
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
