//! Error types for catalog loading

use std::path::PathBuf;

/// Errors raised while fetching or decoding the scenario catalog.
///
/// Any of these is fatal for starting a session: every flow needs at
/// least one scenario.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("io error reading catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog could not be fetched over HTTP
    #[error("failed to fetch catalog from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Catalog endpoint answered with a non-success status
    #[error("catalog request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    /// Catalog body is not a valid scenario collection
    #[error("malformed catalog: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Catalog decoded but holds no scenarios
    #[error("catalog contains no scenarios")]
    Empty,
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
