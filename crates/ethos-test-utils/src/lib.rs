//! Testing utilities for the Ethos workspace
//!
//! Shared fixtures and store doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use ethos_remote::{RecordReceipt, RemoteStore, SubmissionRecord, SubmitError};
use ethos_scenario::{ScenarioCatalog, ScenarioDefinition};
use ethos_session::{ReflectionField, Session, Step};
use ethos_store::{SessionStore, StoreError};
use parking_lot::Mutex;

pub const SAMPLE_CATALOG_JSON: &str = r#"{
  "scenarios": [
    {
      "title": "Deepfake Tip",
      "story": "A viewer sends a video of the mayor that may be synthetic.",
      "strongSignals": ["No original source", "Audio artifacts"],
      "choices": [
        {"text": "Publish now", "consequence": "First, but possibly wrong."},
        {"text": "Hold for forensics", "consequence": "Slower, defensible."}
      ]
    },
    {
      "title": "Chatbot Quotes",
      "story": "An AI assistant drafted quotes for a feature story.",
      "strongSignals": ["Quotes nobody remembers giving"],
      "choices": []
    },
    {
      "title": "Scraped Faces",
      "story": "A vendor offers a face-matching tool built on scraped photos.",
      "strongSignals": [],
      "choices": []
    }
  ]
}"#;

/// Three-scenario catalog parsed from [`SAMPLE_CATALOG_JSON`]
pub fn sample_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_json(SAMPLE_CATALOG_JSON).unwrap()
}

pub fn catalog_of(titles: &[&str]) -> ScenarioCatalog {
    ScenarioCatalog::new(
        titles
            .iter()
            .map(|t| ScenarioDefinition::new(*t, format!("Story of {t}")))
            .collect(),
    )
    .unwrap()
}

pub fn named_session(team: &str) -> Session {
    let mut session = Session::new();
    session.set_team_name(team).unwrap();
    session
}

/// Session that satisfies every precondition for reaching `step`
pub fn session_ready_for(step: Step, catalog: &ScenarioCatalog) -> Session {
    let mut session = Session::new();
    if step == Step::Welcome {
        return session;
    }
    session.set_team_name("Test Team").unwrap();
    if step == Step::Selection {
        return session;
    }
    session
        .select_scenario(0, catalog.get(0).unwrap().clone())
        .unwrap();
    if step == Step::Ethics {
        return session;
    }
    session.add_issue("Unverified source").unwrap();
    if step == Step::Safeguards {
        return session;
    }
    session
        .add_safeguard("Require two independent confirmations", ["Accuracy"])
        .unwrap();
    if step == Step::Reflection {
        return session;
    }
    session
        .set_reflection_field(ReflectionField::Hardest, "Waiting")
        .unwrap();
    session
}

/// Store where every operation fails
#[derive(Debug, Default)]
pub struct FailingStore;

impl SessionStore for FailingStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn put(&self, _blob: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn delete(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}

/// Remote store that keeps every record it is sent
#[derive(Debug, Default)]
pub struct RecordingRemote {
    records: Mutex<Vec<SubmissionRecord>>,
    reject_with: Option<String>,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records are still kept, but every append reports `message`
    pub fn rejecting(message: &str) -> Self {
        Self {
            reject_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<SubmissionRecord> {
        self.records.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.records.lock().len()
    }
}

#[async_trait]
impl RemoteStore for RecordingRemote {
    async fn append(&self, record: &SubmissionRecord) -> Result<RecordReceipt, SubmitError> {
        let n = {
            let mut records = self.records.lock();
            records.push(record.clone());
            records.len()
        };
        match &self.reject_with {
            Some(message) => Err(SubmitError::Rejected {
                status: 422,
                message: message.clone(),
            }),
            None => Ok(RecordReceipt {
                id: Some(format!("rec{n:04}")),
            }),
        }
    }
}
