//! Configuration loading and root folder resolution
//!
//! The root folder holds the SQLite database (identifier cache and
//! attendance snapshots). Resolution priority:
//! 1. Command-line argument
//! 2. `NSAT_ROOT` environment variable
//! 3. `root_folder` key in the TOML config file
//! 4. Platform default (`dirs::data_local_dir()/nsat`)
//!
//! A missing or unreadable config file never terminates startup; it
//! degrades to compiled defaults with a warning.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the root folder
pub const ROOT_ENV_VAR: &str = "NSAT_ROOT";

/// Optional settings from `config.toml`
///
/// All fields are optional; absent values fall back to compiled
/// defaults at the point of use.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder for database and state
    pub root_folder: Option<String>,
    /// Platform API base URL override
    pub api_base: Option<String>,
    /// Organization marker used to filter course titles
    pub org_marker: Option<String>,
    /// Platform domain used to match open course-page contexts
    pub platform_domain: Option<String>,
    /// Enrollment endpoints tried during identifier resolution, in order
    pub enrollment_endpoints: Option<Vec<String>>,
    /// Session token (lowest-priority credential source)
    pub access_token: Option<String>,
    /// Log level filter, e.g. "info" or "nsat_fetch=debug"
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Load from the default platform config path
    ///
    /// Missing file yields defaults silently; an unparsable file
    /// yields defaults with a warning.
    pub fn load() -> Self {
        match default_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit path with graceful degradation
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid config file, using defaults");
                Self::default()
            }
        }
    }
}

/// Default config file location (`<config_dir>/nsat/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nsat").join("config.toml"))
}

/// Platform default root folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("nsat"))
        .unwrap_or_else(|| PathBuf::from(".nsat"))
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return PathBuf::from(path);
    }

    default_root_folder()
}

/// Create the root folder if missing
pub fn ensure_root_folder(root: &Path) -> Result<()> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Failed to create root folder {:?}: {}", root, e)))
}

/// Database file path inside the root folder
pub fn database_path(root: &Path) -> PathBuf {
    root.join("nsat.db")
}
