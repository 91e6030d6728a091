//! Remote store settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credentials and location of the record store
///
/// Supplied externally (config file or environment) and may be absent or
/// left at template placeholders, in which case submission is skipped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub api_key: String,
    pub base_id: String,
    pub table_name: String,
    /// API root, without base or table
    pub endpoint: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl RemoteConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.airtable.com/v0";

    /// Config for `base_id`/`table_name` authenticated with `api_key`
    #[must_use]
    pub fn new(
        api_key: impl Into<String>,
        base_id: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_id: base_id.into(),
            table_name: table_name.into(),
            ..Self::default()
        }
    }

    /// With a different API root
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Whether every credential is filled in with a real value
    #[must_use]
    pub fn is_configured(&self) -> bool {
        [&self.api_key, &self.base_id, &self.table_name]
            .into_iter()
            .all(|v| is_real_value(v))
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_id: String::new(),
            table_name: String::new(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            timeout_secs: 15,
        }
    }
}

// The api key stays out of logs.
impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn is_real_value(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && !(value.starts_with("YOUR_") && value.ends_with("_HERE"))
}
