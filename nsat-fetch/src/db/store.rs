//! SQLite-backed implementation of the `SnapshotStore` port

use crate::db::settings;
use crate::error::FetchResult;
use crate::types::SnapshotStore;
use async_trait::async_trait;
use nsat_common::Snapshot;
use sqlx::SqlitePool;

/// `SnapshotStore` over the shared settings table
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn course_hash(&self) -> FetchResult<Option<String>> {
        Ok(settings::get_course_hash(&self.pool).await?)
    }

    async fn set_course_hash(&self, hash: &str) -> FetchResult<()> {
        Ok(settings::set_course_hash(&self.pool, hash).await?)
    }

    async fn clear_course_hash(&self) -> FetchResult<()> {
        Ok(settings::clear_course_hash(&self.pool).await?)
    }

    async fn snapshot(&self) -> FetchResult<Option<Snapshot>> {
        Ok(settings::get_snapshot(&self.pool).await?)
    }

    async fn save_snapshot(&self, snapshot: &Snapshot) -> FetchResult<()> {
        Ok(settings::save_snapshot(&self.pool, snapshot).await?)
    }
}
