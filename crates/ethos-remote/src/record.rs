//! Flattened record sent to the external store

use crate::error::SubmitError;
use chrono::{DateTime, Utc};
use ethos_session::{Confidence, Safeguard, Session};
use serde::{Deserialize, Serialize};

/// One row per finished session, keyed by the store's column names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    #[serde(rename = "Team Name")]
    pub team_name: String,
    #[serde(rename = "Scenario")]
    pub scenario: String,
    /// Issues, one per line
    #[serde(rename = "Ethical Issues")]
    pub ethical_issues: String,
    /// `text [tag, tag]` entries separated by a blank line
    #[serde(rename = "Safeguards")]
    pub safeguards: String,
    #[serde(rename = "Reflection Hardest")]
    pub reflection_hardest: String,
    #[serde(rename = "Reflection Disagreement")]
    pub reflection_disagreement: String,
    #[serde(rename = "Reflection Confidence")]
    pub reflection_confidence: u8,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl SubmissionRecord {
    /// Flatten `session` as of `submitted_at`
    ///
    /// # Errors
    /// `SubmitError::NothingToSubmit` when no scenario is in progress.
    pub fn from_session(
        session: &Session,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, SubmitError> {
        let (Some(team), Some(work)) = (session.team(), session.work()) else {
            return Err(SubmitError::NothingToSubmit);
        };
        let reflection = work.reflection();

        Ok(Self {
            team_name: team.as_str().to_string(),
            scenario: work.scenario().title.clone(),
            ethical_issues: work
                .issues()
                .iter()
                .map(|i| i.trim())
                .collect::<Vec<_>>()
                .join("\n"),
            safeguards: work
                .safeguards()
                .iter()
                .map(format_safeguard)
                .collect::<Vec<_>>()
                .join("\n\n"),
            reflection_hardest: reflection.hardest().unwrap_or_default().to_string(),
            reflection_disagreement: reflection.disagreement().unwrap_or_default().to_string(),
            reflection_confidence: reflection
                .confidence()
                .unwrap_or(Confidence::DEFAULT)
                .value(),
            timestamp: submitted_at,
        })
    }
}

/// `text [tag1, tag2]`, or just `text` without tags
#[must_use]
pub fn format_safeguard(safeguard: &Safeguard) -> String {
    if safeguard.tags().is_empty() {
        safeguard.text().to_string()
    } else {
        let tags: Vec<&str> = safeguard.tags().iter().map(String::as_str).collect();
        format!("{} [{}]", safeguard.text(), tags.join(", "))
    }
}
