//! Error types for session mutation and step navigation

use crate::flow::{Blocker, Step};

/// Session mutation errors
///
/// Every variant leaves the session untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Text that is empty after trimming
    #[error("{0} is empty")]
    Blank(&'static str),

    /// Unusable input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Remove by index outside current bounds
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Operation needs a chosen scenario
    #[error("no scenario selected")]
    NoScenarioSelected,

    /// Operation needs a team name
    #[error("no team name set")]
    NoTeam,
}

impl SessionError {
    /// Create invalid input error
    #[inline]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Step navigation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// Forward move blocked by an unmet precondition
    #[error("cannot move from {from} to {to}: {blocker}")]
    Blocked { from: Step, to: Step, blocker: Blocker },

    /// Already at the final step
    #[error("{0} is the last step")]
    NoNextStep(Step),

    /// Already at the first step
    #[error("{0} is the first step")]
    NoPreviousStep(Step),

    /// Action belongs to another step
    #[error("'{action}' is not available in the {step} step")]
    ActionUnavailable { action: &'static str, step: Step },

    /// Scenario index not present in the catalog
    #[error("no scenario at position {index} (catalog has {len})")]
    UnknownScenario { index: usize, len: usize },

    /// Underlying session mutation failed
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl FlowError {
    /// Whether the error is blank text the UI should just ignore
    #[inline]
    #[must_use]
    pub fn is_blank_input(&self) -> bool {
        matches!(self, Self::Session(SessionError::Blank(_)))
    }
}
