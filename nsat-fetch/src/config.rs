//! Fetch configuration resolution
//!
//! Per-setting priority: environment variable → TOML config file →
//! compiled default. The enrollment endpoint list has no environment
//! variable (TOML → default only); its order is significant, the
//! primary endpoint is tried first, then the alternates.

use nsat_common::config::TomlConfig;
use tracing::debug;

/// Default platform API base URL
pub const DEFAULT_API_BASE: &str = "https://my.newtonschool.co/api/v2";

/// Domain used to match open platform contexts
pub const DEFAULT_PLATFORM_DOMAIN: &str = "newtonschool.co";

/// Marker string identifying organization courses by title
pub const DEFAULT_ORG_MARKER: &str = "Newton School of Technology";

/// Enrollment endpoints in resolution order (primary first)
pub const DEFAULT_ENROLLMENT_ENDPOINTS: [&str; 4] = [
    "/user/enrolled_courses/",
    "/user/courses/",
    "/course/enrolled/",
    "/user/course/all/",
];

/// Environment variable overriding the API base URL
pub const API_BASE_ENV_VAR: &str = "NSAT_API_BASE";

/// Environment variable overriding the organization marker
pub const ORG_MARKER_ENV_VAR: &str = "NSAT_ORG_MARKER";

/// Environment variable overriding the platform domain
pub const PLATFORM_DOMAIN_ENV_VAR: &str = "NSAT_PLATFORM_DOMAIN";

/// Resolved settings for one pipeline instance
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Platform API base URL, without trailing slash
    pub api_base: String,
    /// Domain filter for open-context enumeration
    pub platform_domain: String,
    /// Organization marker matched against course titles
    pub org_marker: String,
    /// Ordered enrollment endpoints for identifier resolution
    pub enrollment_endpoints: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            platform_domain: DEFAULT_PLATFORM_DOMAIN.to_string(),
            org_marker: DEFAULT_ORG_MARKER.to_string(),
            enrollment_endpoints: DEFAULT_ENROLLMENT_ENDPOINTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl FetchConfig {
    /// Resolve from ENV → TOML → defaults
    pub fn resolve(toml_config: &TomlConfig) -> Self {
        let mut config = Self::default();

        if let Some(base) = resolve_setting(API_BASE_ENV_VAR, toml_config.api_base.as_deref()) {
            config.api_base = base;
        }
        if let Some(marker) = resolve_setting(ORG_MARKER_ENV_VAR, toml_config.org_marker.as_deref())
        {
            config.org_marker = marker;
        }
        if let Some(domain) = resolve_setting(
            PLATFORM_DOMAIN_ENV_VAR,
            toml_config.platform_domain.as_deref(),
        ) {
            config.platform_domain = domain;
        }
        if let Some(endpoints) = &toml_config.enrollment_endpoints {
            if !endpoints.is_empty() {
                config.enrollment_endpoints = endpoints.clone();
            }
        }

        debug!(
            api_base = %config.api_base,
            org_marker = %config.org_marker,
            "Resolved fetch configuration"
        );

        config
    }
}

/// One setting: ENV beats TOML; empty values are ignored
fn resolve_setting(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Some(value);
        }
    }
    toml_value
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults_when_nothing_configured() {
        std::env::remove_var(API_BASE_ENV_VAR);
        std::env::remove_var(ORG_MARKER_ENV_VAR);
        std::env::remove_var(PLATFORM_DOMAIN_ENV_VAR);

        let config = FetchConfig::resolve(&TomlConfig::default());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.org_marker, DEFAULT_ORG_MARKER);
        assert_eq!(config.platform_domain, DEFAULT_PLATFORM_DOMAIN);
        assert_eq!(config.enrollment_endpoints.len(), 4);
        assert_eq!(config.enrollment_endpoints[0], "/user/enrolled_courses/");
    }

    #[test]
    #[serial]
    fn test_env_beats_toml() {
        std::env::set_var(API_BASE_ENV_VAR, "https://env.test/api");
        let toml = TomlConfig {
            api_base: Some("https://toml.test/api".into()),
            ..Default::default()
        };

        let config = FetchConfig::resolve(&toml);
        assert_eq!(config.api_base, "https://env.test/api");

        std::env::remove_var(API_BASE_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_toml_beats_default() {
        std::env::remove_var(ORG_MARKER_ENV_VAR);
        let toml = TomlConfig {
            org_marker: Some("Some Other School".into()),
            ..Default::default()
        };

        let config = FetchConfig::resolve(&toml);
        assert_eq!(config.org_marker, "Some Other School");
    }

    #[test]
    #[serial]
    fn test_platform_domain_env_beats_toml() {
        std::env::set_var(PLATFORM_DOMAIN_ENV_VAR, "env.example.test");
        let toml = TomlConfig {
            platform_domain: Some("toml.example.test".into()),
            ..Default::default()
        };

        let config = FetchConfig::resolve(&toml);
        assert_eq!(config.platform_domain, "env.example.test");

        std::env::remove_var(PLATFORM_DOMAIN_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_enrollment_endpoints_from_toml() {
        let toml = TomlConfig {
            enrollment_endpoints: Some(vec!["/custom/enrolled/".into()]),
            ..Default::default()
        };

        let config = FetchConfig::resolve(&toml);
        assert_eq!(config.enrollment_endpoints, vec!["/custom/enrolled/"]);
    }

    #[test]
    #[serial]
    fn test_empty_endpoint_list_keeps_defaults() {
        let toml = TomlConfig {
            enrollment_endpoints: Some(vec![]),
            ..Default::default()
        };

        let config = FetchConfig::resolve(&toml);
        assert_eq!(config.enrollment_endpoints.len(), 4);
    }
}
