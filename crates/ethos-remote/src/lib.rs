//! Ethos Remote Submission
//!
//! Mirrors a finished session to an external record store.
//!
//! - [`SubmissionRecord`]: the flattened, store-facing row
//! - [`RemoteStore`]: write-only append seam; [`AirtableStore`] speaks the
//!   Airtable REST API
//! - [`Submitter`]: fire-and-forget dispatch, one spawned attempt per call
//!
//! Submission is derived and non-authoritative. Not configured means a
//! silent skip; a failed attempt becomes a warning outcome and never
//! touches local state. There is no retry.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod airtable;
pub mod config;
pub mod error;
pub mod record;
pub mod submitter;

use async_trait::async_trait;
use std::fmt::Debug;

pub use airtable::AirtableStore;
pub use config::RemoteConfig;
pub use error::SubmitError;
pub use record::{format_safeguard, SubmissionRecord};
pub use submitter::{SubmissionOutcome, SubmissionTicket, Submitter};

/// Acknowledgement from the record store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordReceipt {
    /// Store-assigned identifier, when the store returns one
    pub id: Option<String>,
}

/// Write-only append of one record per finished session
#[async_trait]
pub trait RemoteStore: Debug + Send + Sync {
    /// Append `record`
    ///
    /// # Errors
    /// Transport, authentication, quota or validation failures.
    async fn append(&self, record: &SubmissionRecord) -> Result<RecordReceipt, SubmitError>;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
