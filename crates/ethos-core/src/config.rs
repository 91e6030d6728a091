//! Application configuration
//!
//! Layered in order: built-in defaults, an optional TOML file, `ETHOS_*`
//! environment variables, then command-line flags (applied by the caller
//! through the `with_*` builders).

use crate::error::ConfigError;
use ethos_remote::RemoteConfig;
use ethos_scenario::CatalogSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is named
pub const DEFAULT_CONFIG_FILE: &str = "ethos.toml";

pub const ENV_STORAGE_DIR: &str = "ETHOS_STORAGE_DIR";
pub const ENV_CATALOG: &str = "ETHOS_CATALOG";
pub const ENV_LOG: &str = "ETHOS_LOG";
pub const ENV_AIRTABLE_API_KEY: &str = "ETHOS_AIRTABLE_API_KEY";
pub const ENV_AIRTABLE_BASE_ID: &str = "ETHOS_AIRTABLE_BASE_ID";
pub const ENV_AIRTABLE_TABLE: &str = "ETHOS_AIRTABLE_TABLE";

/// Ethos configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthosConfig {
    /// Directory holding the saved session
    pub storage_dir: PathBuf,
    /// Scenario catalog, a file path or an http(s) URL
    pub catalog: String,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Record store for finished sessions; absent means local only
    pub remote: Option<RemoteConfig>,
}

impl Default for EthosConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(".ethos"),
            catalog: "scenarios.json".to_string(),
            log_level: "info".to_string(),
            remote: None,
        }
    }
}

impl EthosConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    ///
    /// # Errors
    /// `ConfigError::Parse` for malformed TOML or mistyped values.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Read a TOML config file
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, `ConfigError::Parse`
    /// when it is not valid.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Defaults, then `explicit` (or `ethos.toml` when present), then the
    /// process environment.
    ///
    /// # Errors
    /// An explicitly named file must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match explicit {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        Ok(base.with_env(|key| std::env::var(key).ok()))
    }

    /// Overlay `ETHOS_*` variables read through `lookup`
    #[must_use]
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = lookup(ENV_STORAGE_DIR) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(catalog) = lookup(ENV_CATALOG) {
            self.catalog = catalog;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.log_level = level;
        }

        let api_key = lookup(ENV_AIRTABLE_API_KEY);
        let base_id = lookup(ENV_AIRTABLE_BASE_ID);
        let table = lookup(ENV_AIRTABLE_TABLE);
        if api_key.is_some() || base_id.is_some() || table.is_some() {
            let remote = self.remote.get_or_insert_with(RemoteConfig::default);
            if let Some(v) = api_key {
                remote.api_key = v;
            }
            if let Some(v) = base_id {
                remote.base_id = v;
            }
            if let Some(v) = table {
                remote.table_name = v;
            }
        }
        self
    }

    /// With storage directory
    #[inline]
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }

    /// With catalog location
    #[inline]
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// With default log level
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// With remote record store
    #[inline]
    #[must_use]
    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::parse(&self.catalog)
    }

    /// Remote settings, only when every credential is filled in
    #[must_use]
    pub fn remote_config(&self) -> Option<&RemoteConfig> {
        self.remote.as_ref().filter(|r| r.is_configured())
    }
}
