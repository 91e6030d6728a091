//! Report errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Export needs a team and a selected scenario
    #[error("nothing to export yet: choose a team and a scenario first")]
    NothingToExport,
}
