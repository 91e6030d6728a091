//! Error types for remote submission

/// Remote submission errors
///
/// All of these are non-fatal: they are shown as a warning and the local
/// session stays intact and exportable.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Session has no scenario to report
    #[error("no finished scenario to submit")]
    NothingToSubmit,

    /// Remote settings are unusable
    #[error("invalid remote configuration: {0}")]
    InvalidConfig(String),

    /// Request never got an answer
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Store answered with an error
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Background task did not complete
    #[error("submission task failed: {0}")]
    TaskFailed(String),
}

impl SubmitError {
    /// HTTP status of a rejection, if any
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
