//! Error types for Ethos Core
//!
//! Each layer keeps its own error enum; [`EthosError`] gathers them for
//! callers that drive the whole exercise.

use ethos_remote::SubmitError;
use ethos_report::ReportError;
use ethos_scenario::CatalogError;
use ethos_session::{FlowError, SessionError};
use ethos_store::StoreError;
use std::path::PathBuf;

/// Main Ethos error type
#[derive(Debug, thiserror::Error)]
pub enum EthosError {
    /// Scenario catalog could not be loaded
    #[error("scenario catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// Flow step or mutation refused
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Durable store failed where failure is not swallowed
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Remote store could not be set up
    #[error("remote submission error: {0}")]
    Submit(#[from] SubmitError),

    /// Report could not be produced
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Line command could not be understood
    #[error(transparent)]
    Command(#[from] crate::command::CommandParseError),

    /// Log subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),

    /// File system error outside the session store
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SessionError> for EthosError {
    fn from(err: SessionError) -> Self {
        Self::Flow(FlowError::Session(err))
    }
}

impl EthosError {
    /// Create I/O error
    #[inline]
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the user can simply correct their input and carry on
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Flow(_) | Self::Command(_) | Self::Report(ReportError::NothingToExport)
        )
    }

    /// Blank text: a silent no-op for the user
    #[inline]
    #[must_use]
    pub fn is_blank_input(&self) -> bool {
        matches!(self, Self::Flow(e) if e.is_blank_input())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`crate::EthosConfig`]
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// A single setting holds an unusable value
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}
