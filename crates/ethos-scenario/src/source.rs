//! Where the catalog comes from

use crate::error::CatalogError;
use std::fmt;
use std::path::PathBuf;

/// Location of the scenario catalog document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Local JSON file
    File(PathBuf),
    /// HTTP(S) URL serving the JSON document
    Url(String),
}

impl CatalogSource {
    /// File source
    #[inline]
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Interpret a user-supplied location: `http://` and `https://` are
    /// URLs, anything else is a path.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }

    pub(crate) async fn fetch(&self) -> Result<String, CatalogError> {
        match self {
            Self::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| CatalogError::io_error(path, e)),
            Self::Url(url) => {
                let response = reqwest::get(url)
                    .await
                    .map_err(|source| CatalogError::Fetch {
                        url: url.clone(),
                        source,
                    })?;
                let status = response.status();
                if !status.is_success() {
                    return Err(CatalogError::Status {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await.map_err(|source| CatalogError::Fetch {
                    url: url.clone(),
                    source,
                })
            }
        }
    }
}

impl fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{url}"),
        }
    }
}
