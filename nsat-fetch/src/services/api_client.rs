//! Newton platform API client
//!
//! Thin reqwest wrapper over the platform endpoints the pipeline
//! needs: the learning-course list, the enrollment queries used for
//! identifier resolution, and per-course attendance statistics.
//! Every transport or status failure maps to `FetchError::Network`.

use crate::error::{FetchError, FetchResult};
use crate::types::{CourseApi, CourseStats};
use async_trait::async_trait;
use nsat_common::CourseRecord;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("nsat/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Newton platform API
pub struct NewtonClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl NewtonClient {
    /// Build a client for the given API base URL (no trailing slash)
    pub fn new(api_base: impl Into<String>) -> FetchResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_base: api_base.into(),
        })
    }

    /// GET a JSON payload from an API path with bearer auth
    async fn get_json(&self, path: &str, token: &str) -> FetchResult<serde_json::Value> {
        let url = format!("{}{}", self.api_base, path);
        debug!(url = %url, "Querying platform API");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!("API error {}: {}", status, url)));
        }

        response
            .json()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

#[async_trait]
impl CourseApi for NewtonClient {
    async fn learning_courses(
        &self,
        course_hash: &str,
        token: &str,
    ) -> FetchResult<Vec<CourseRecord>> {
        let path = format!("/course/h/{}/learning_course/all/?pagination=false", course_hash);
        let payload = self.get_json(&path, token).await?;

        normalize_course_payload(&payload)
            .ok_or_else(|| FetchError::Network("Unexpected course list response shape".into()))
    }

    async fn enrollment_payload(
        &self,
        endpoint: &str,
        token: &str,
    ) -> FetchResult<serde_json::Value> {
        self.get_json(endpoint, token).await
    }

    async fn course_stats(&self, course_hash: &str, token: &str) -> FetchResult<CourseStats> {
        let path = format!("/course/h/{}/self_performance", course_hash);
        let payload = self.get_json(&path, token).await?;

        serde_json::from_value(payload).map_err(|e| FetchError::Network(e.to_string()))
    }
}

/// Normalize a course-list payload into records
///
/// Fixed precedence: a bare array is taken as-is; otherwise the value
/// under `results`, otherwise the value under `data`. Returns None for
/// any other shape. Additional wrapper shapes in the live API are a
/// known limitation.
pub fn normalize_course_payload(payload: &serde_json::Value) -> Option<Vec<CourseRecord>> {
    let list = if payload.is_array() {
        payload
    } else if let Some(results) = payload.get("results") {
        results
    } else if let Some(data) = payload.get("data") {
        data
    } else {
        return None;
    };

    serde_json::from_value(list.clone()).ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_bare_array() {
        let payload = json!([
            {"hash": "h1", "title": "A", "short_display_name": "CS101"},
        ]);
        let courses = normalize_course_payload(&payload).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].hash.as_deref(), Some("h1"));
    }

    #[test]
    fn test_normalize_results_wrapper() {
        let payload = json!({"results": [{"hash": "h2"}]});
        let courses = normalize_course_payload(&payload).unwrap();
        assert_eq!(courses[0].hash.as_deref(), Some("h2"));
    }

    #[test]
    fn test_normalize_data_wrapper() {
        let payload = json!({"data": [{"hash": "h3"}]});
        let courses = normalize_course_payload(&payload).unwrap();
        assert_eq!(courses[0].hash.as_deref(), Some("h3"));
    }

    #[test]
    fn test_normalize_results_beats_data() {
        let payload = json!({
            "results": [{"hash": "from-results"}],
            "data": [{"hash": "from-data"}],
        });
        let courses = normalize_course_payload(&payload).unwrap();
        assert_eq!(courses[0].hash.as_deref(), Some("from-results"));
    }

    #[test]
    fn test_normalize_unknown_shape() {
        assert!(normalize_course_payload(&json!({"items": []})).is_none());
        assert!(normalize_course_payload(&json!(42)).is_none());
        assert!(normalize_course_payload(&json!({"results": "nope"})).is_none());
    }

    #[test]
    fn test_client_creation() {
        assert!(NewtonClient::new("https://example.test/api/v2").is_ok());
    }
}
