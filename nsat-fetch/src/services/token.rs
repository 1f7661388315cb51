//! Session token resolution
//!
//! Three-tier credential source: explicit CLI value → `NSAT_ACCESS_TOKEN`
//! environment variable → TOML config file. No token from any tier
//! yields `FetchError::NotAuthenticated`; the pipeline never falls
//! back to cached data for that case.

use crate::error::{FetchError, FetchResult};
use crate::types::CredentialProvider;
use async_trait::async_trait;
use tracing::debug;

/// Environment variable carrying the session token
pub const TOKEN_ENV_VAR: &str = "NSAT_ACCESS_TOKEN";

/// CLI-side credential provider
pub struct TokenProvider {
    cli_token: Option<String>,
    toml_token: Option<String>,
}

impl TokenProvider {
    /// Build from the CLI flag value and the TOML config value
    pub fn new(cli_token: Option<String>, toml_token: Option<String>) -> Self {
        Self {
            cli_token,
            toml_token,
        }
    }
}

#[async_trait]
impl CredentialProvider for TokenProvider {
    async fn access_token(&self) -> FetchResult<String> {
        if let Some(token) = self.cli_token.as_ref().filter(|t| !t.is_empty()) {
            debug!("Session token from command line");
            return Ok(token.clone());
        }

        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            if !token.is_empty() {
                debug!("Session token from environment");
                return Ok(token);
            }
        }

        if let Some(token) = self.toml_token.as_ref().filter(|t| !t.is_empty()) {
            debug!("Session token from config file");
            return Ok(token.clone());
        }

        Err(FetchError::NotAuthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[tokio::test]
    #[serial]
    async fn test_cli_token_wins() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        let provider = TokenProvider::new(Some("cli-token".into()), Some("toml-token".into()));
        assert_eq!(provider.access_token().await.unwrap(), "cli-token");
        std::env::remove_var(TOKEN_ENV_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn test_env_token_beats_toml() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        let provider = TokenProvider::new(None, Some("toml-token".into()));
        assert_eq!(provider.access_token().await.unwrap(), "env-token");
        std::env::remove_var(TOKEN_ENV_VAR);
    }

    #[tokio::test]
    #[serial]
    async fn test_no_token_is_not_authenticated() {
        std::env::remove_var(TOKEN_ENV_VAR);
        let provider = TokenProvider::new(None, None);
        assert!(matches!(
            provider.access_token().await,
            Err(FetchError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_empty_tokens_are_ignored() {
        std::env::remove_var(TOKEN_ENV_VAR);
        let provider = TokenProvider::new(Some("".into()), Some("toml-token".into()));
        assert_eq!(provider.access_token().await.unwrap(), "toml-token");
    }
}
