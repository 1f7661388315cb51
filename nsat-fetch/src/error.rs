//! Error types for the fetch pipeline

use thiserror::Error;

/// Result type for fetch pipeline operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Failure kinds surfaced by the fetch pipeline
///
/// Per-course statistics failures are absorbed inside the aggregator
/// and never appear here; everything else escalates to the
/// orchestrator, which applies the stale-cache policy.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No valid session token available; the user must log in.
    /// Never answered from the cache.
    #[error("Not logged in: no session token available")]
    NotAuthenticated,

    /// Every identifier resolution strategy was exhausted
    #[error("Could not determine the enrolling course")]
    ResolutionFailed,

    /// A remote query failed after authentication
    #[error("Network error: {0}")]
    Network(String),

    /// A cached snapshot was requested but none has been persisted
    #[error("No cached attendance data available")]
    NoCachedData,

    /// Local persistence failed (wraps sqlx::Error)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
