//! Fire-and-forget dispatch of finished sessions

use crate::airtable::AirtableStore;
use crate::config::RemoteConfig;
use crate::error::SubmitError;
use crate::record::SubmissionRecord;
use crate::RemoteStore;
use chrono::Utc;
use ethos_session::Session;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What became of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// No remote store configured; nothing was sent
    Skipped,
    /// Store accepted the record
    Stored { id: Option<String> },
    /// Attempt failed; local data is unaffected
    Failed { message: String },
}

impl SubmissionOutcome {
    /// Whether the outcome should be shown to the user as a warning
    #[inline]
    #[must_use]
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

impl From<Result<crate::RecordReceipt, SubmitError>> for SubmissionOutcome {
    fn from(value: Result<crate::RecordReceipt, SubmitError>) -> Self {
        match value {
            Ok(receipt) => Self::Stored { id: receipt.id },
            Err(e) => Self::Failed {
                message: e.to_string(),
            },
        }
    }
}

#[derive(Debug)]
enum Ticket {
    Ready(SubmissionOutcome),
    Pending(JoinHandle<SubmissionOutcome>),
}

/// Handle to one submission attempt
///
/// Dropping it does not cancel the attempt.
#[derive(Debug)]
pub struct SubmissionTicket {
    inner: Ticket,
}

impl SubmissionTicket {
    fn ready(outcome: SubmissionOutcome) -> Self {
        Self {
            inner: Ticket::Ready(outcome),
        }
    }

    /// Whether the attempt is still running in the background
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(&self.inner, Ticket::Pending(handle) if !handle.is_finished())
    }

    /// Wait for the attempt to finish
    pub async fn outcome(self) -> SubmissionOutcome {
        match self.inner {
            Ticket::Ready(outcome) => outcome,
            Ticket::Pending(handle) => handle.await.unwrap_or_else(|e| SubmissionOutcome::Failed {
                message: SubmitError::TaskFailed(e.to_string()).to_string(),
            }),
        }
    }
}

/// Dispatches submissions to an optional remote store
///
/// Every [`submit`](Self::submit) call makes exactly one attempt. There is
/// no deduplication: a session that reaches the summary twice is sent
/// twice, each with its own timestamp.
#[derive(Debug, Clone, Default)]
pub struct Submitter {
    remote: Option<Arc<dyn RemoteStore>>,
    events: Option<mpsc::UnboundedSender<SubmissionOutcome>>,
}

impl Submitter {
    /// Submitter that always skips
    #[inline]
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Submitter backed by `remote`
    #[inline]
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            remote: Some(remote),
            events: None,
        }
    }

    /// Airtable submitter when `config` is filled in, otherwise disabled
    ///
    /// # Errors
    /// `SubmitError::InvalidConfig` or `SubmitError::Transport` when the
    /// configured store cannot be built.
    pub fn from_config(config: Option<&RemoteConfig>) -> Result<Self, SubmitError> {
        match config {
            Some(config) if config.is_configured() => {
                let store = AirtableStore::new(config)?;
                tracing::info!(url = %store.url(), "remote submission enabled");
                Ok(Self::new(Arc::new(store)))
            }
            _ => {
                tracing::info!("remote submission not configured; finished sessions stay local");
                Ok(Self::disabled())
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Receive every outcome as it happens
    ///
    /// Replaces any previous subscriber.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<SubmissionOutcome> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.events = Some(tx);
        rx
    }

    /// Start one attempt for `session` without waiting for it.
    ///
    /// The record is built immediately, so later edits to the session do
    /// not leak into an attempt already in flight.
    #[must_use = "the ticket reports the outcome; drop it to fire and forget"]
    pub fn submit(&self, session: &Session) -> SubmissionTicket {
        let Some(remote) = self.remote.clone() else {
            tracing::debug!("remote submission skipped: not configured");
            return self.finish_now(SubmissionOutcome::Skipped);
        };

        let record = match SubmissionRecord::from_session(session, Utc::now()) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "remote submission skipped");
                return self.finish_now(SubmissionOutcome::Skipped);
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("remote submission needs an async runtime; none is running");
            return self.finish_now(SubmissionOutcome::Failed {
                message: SubmitError::TaskFailed("no async runtime".to_string()).to_string(),
            });
        };

        let events = self.events.clone();
        let handle = runtime.spawn(async move {
            tracing::info!(
                team = %record.team_name,
                scenario = %record.scenario,
                "submitting session"
            );
            let outcome = SubmissionOutcome::from(remote.append(&record).await);
            match &outcome {
                SubmissionOutcome::Stored { id } => {
                    tracing::info!(id = id.as_deref(), "session saved to remote store");
                }
                SubmissionOutcome::Failed { message } => {
                    tracing::warn!(%message, "remote submission failed; session kept locally");
                }
                SubmissionOutcome::Skipped => {}
            }
            if let Some(tx) = events {
                let _ = tx.send(outcome.clone());
            }
            outcome
        });

        SubmissionTicket {
            inner: Ticket::Pending(handle),
        }
    }

    fn finish_now(&self, outcome: SubmissionOutcome) -> SubmissionTicket {
        if let Some(tx) = &self.events {
            let _ = tx.send(outcome.clone());
        }
        SubmissionTicket::ready(outcome)
    }
}
