//! Settings table operations
//!
//! Get/set/delete accessors over the `settings` key/value table, plus
//! typed accessors for the course-hash cache and the attendance
//! snapshot.

use chrono::{DateTime, Utc};
use nsat_common::Snapshot;
use sqlx::{Pool, Sqlite};
use tracing::warn;

const COURSE_HASH_KEY: &str = "course_hash";
const ATTENDANCE_DATA_KEY: &str = "attendance_data";
const LAST_FETCHED_KEY: &str = "last_fetched";

/// Get cached course hash
///
/// Returns Some(hash) if a resolution previously succeeded, None otherwise
pub async fn get_course_hash(db: &Pool<Sqlite>) -> Result<Option<String>, sqlx::Error> {
    get_setting(db, COURSE_HASH_KEY).await
}

/// Persist a resolved course hash
pub async fn set_course_hash(db: &Pool<Sqlite>, hash: &str) -> Result<(), sqlx::Error> {
    set_setting(db, COURSE_HASH_KEY, hash).await
}

/// Drop the cached course hash
pub async fn clear_course_hash(db: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    delete_setting(db, COURSE_HASH_KEY).await
}

/// Get the last persisted attendance snapshot
///
/// A snapshot needs both the record list and the timestamp; if either
/// is missing or unparsable the cache is treated as absent.
pub async fn get_snapshot(db: &Pool<Sqlite>) -> Result<Option<Snapshot>, sqlx::Error> {
    let Some(json) = get_setting(db, ATTENDANCE_DATA_KEY).await? else {
        return Ok(None);
    };
    let Some(ts) = get_setting(db, LAST_FETCHED_KEY).await? else {
        return Ok(None);
    };

    let records = match serde_json::from_str(&json) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, "Stored attendance snapshot is unreadable, ignoring");
            return Ok(None);
        }
    };

    let fetched_at = match DateTime::parse_from_rfc3339(&ts) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            warn!(error = %e, "Stored snapshot timestamp is unreadable, ignoring");
            return Ok(None);
        }
    };

    Ok(Some(Snapshot {
        records,
        fetched_at,
    }))
}

/// Replace the persisted attendance snapshot
pub async fn save_snapshot(db: &Pool<Sqlite>, snapshot: &Snapshot) -> Result<(), sqlx::Error> {
    let json = serde_json::to_string(&snapshot.records)
        .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

    set_setting(db, ATTENDANCE_DATA_KEY, &json).await?;
    set_setting(db, LAST_FETCHED_KEY, &snapshot.fetched_at.to_rfc3339()).await?;

    Ok(())
}

/// Generic setting getter (internal)
async fn get_setting(db: &Pool<Sqlite>, key: &str) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(db)
        .await?;

    Ok(row.map(|(value,)| value))
}

/// Generic setting setter (internal)
async fn set_setting(db: &Pool<Sqlite>, key: &str, value: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(key)
    .bind(value)
    .execute(db)
    .await?;

    Ok(())
}

/// Generic setting delete (internal)
async fn delete_setting(db: &Pool<Sqlite>, key: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(db)
        .await?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use nsat_common::AttendanceRecord;

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            records: vec![AttendanceRecord::new(0, "CS101".into(), 40, 50, 18, 25)],
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_course_hash_roundtrip() {
        let pool = test_pool().await;

        assert_eq!(get_course_hash(&pool).await.unwrap(), None);

        set_course_hash(&pool, "abc123").await.unwrap();
        assert_eq!(get_course_hash(&pool).await.unwrap(), Some("abc123".into()));

        // UPSERT replaces
        set_course_hash(&pool, "def456").await.unwrap();
        assert_eq!(get_course_hash(&pool).await.unwrap(), Some("def456".into()));

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM settings WHERE key = 'course_hash'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_clear_course_hash() {
        let pool = test_pool().await;

        set_course_hash(&pool, "abc123").await.unwrap();
        clear_course_hash(&pool).await.unwrap();
        assert_eq!(get_course_hash(&pool).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_snapshot_roundtrip() {
        let pool = test_pool().await;

        assert!(get_snapshot(&pool).await.unwrap().is_none());

        let snapshot = sample_snapshot();
        save_snapshot(&pool, &snapshot).await.unwrap();

        let loaded = get_snapshot(&pool).await.unwrap().unwrap();
        assert_eq!(loaded.records, snapshot.records);
        assert_eq!(
            loaded.fetched_at.timestamp_millis(),
            snapshot.fetched_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_treated_as_absent() {
        let pool = test_pool().await;

        set_setting(&pool, ATTENDANCE_DATA_KEY, "not json").await.unwrap();
        set_setting(&pool, LAST_FETCHED_KEY, &Utc::now().to_rfc3339())
            .await
            .unwrap();

        assert!(get_snapshot(&pool).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_without_timestamp_treated_as_absent() {
        let pool = test_pool().await;

        set_setting(&pool, ATTENDANCE_DATA_KEY, "[]").await.unwrap();
        assert!(get_snapshot(&pool).await.unwrap().is_none());
    }
}
