//! Environment hint providers
//!
//! The original resolution source is the set of open browser tabs on
//! the platform domain. A CLI has no browsing contexts, so the default
//! provider is empty and resolution degrades to the enrollment-query
//! strategies. `EnvContextProvider` lets a user supply a course page
//! URL through `NSAT_COURSE_URL` instead of opening a tab.

use crate::types::ContextProvider;
use async_trait::async_trait;

/// Environment variable holding a platform course page URL
pub const COURSE_URL_ENV_VAR: &str = "NSAT_COURSE_URL";

/// Hint provider with no context concept; always empty
pub struct NoContexts;

#[async_trait]
impl ContextProvider for NoContexts {
    async fn open_locations(&self, _domain: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Hint provider backed by the `NSAT_COURSE_URL` environment variable
pub struct EnvContextProvider;

#[async_trait]
impl ContextProvider for EnvContextProvider {
    async fn open_locations(&self, domain: &str) -> Vec<String> {
        match std::env::var(COURSE_URL_ENV_VAR) {
            Ok(url) if url.contains(domain) => vec![url],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    async fn test_no_contexts_is_empty() {
        assert!(NoContexts.open_locations("newtonschool.co").await.is_empty());
    }

    #[tokio::test]
    #[serial]
    async fn test_env_provider_filters_by_domain() {
        std::env::set_var(
            COURSE_URL_ENV_VAR,
            "https://my.newtonschool.co/course/abc123/home",
        );

        let hits = EnvContextProvider.open_locations("newtonschool.co").await;
        assert_eq!(hits.len(), 1);

        let misses = EnvContextProvider.open_locations("example.org").await;
        assert!(misses.is_empty());

        std::env::remove_var(COURSE_URL_ENV_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn test_env_provider_without_variable() {
        std::env::remove_var(COURSE_URL_ENV_VAR);
        assert!(EnvContextProvider
            .open_locations("newtonschool.co")
            .await
            .is_empty());
    }
}
