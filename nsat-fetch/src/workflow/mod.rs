//! Fetch workflow
//!
//! The pipeline stages, leaf-first: course grouping, identifier
//! resolution, attendance aggregation, and the orchestrator that
//! sequences them and owns the stale-cache fallback policy.

pub mod aggregator;
pub mod grouper;
pub mod orchestrator;
pub mod resolver;

pub use orchestrator::{FetchOutcome, FetchPipeline, StaleReason};
