//! nsat-fetch library interface
//!
//! The attendance fetch/aggregation engine: collaborator ports, the
//! platform API client, SQLite persistence, and the workflow pipeline
//! (resolve → fetch → group → aggregate → persist). Exposed as a
//! library for integration testing; the binary adds the CLI surface.

pub mod config;
pub mod db;
pub mod error;
pub mod render;
pub mod services;
pub mod types;
pub mod workflow;

pub use crate::error::{FetchError, FetchResult};
pub use crate::workflow::{FetchOutcome, FetchPipeline, StaleReason};
