//! Scenario definitions and the catalog that holds them

use crate::error::CatalogError;
use crate::source::CatalogSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One decision the team may weigh, with its likely consequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub consequence: String,
}

/// Immutable narrative unit presented to the team
///
/// Has no identifier of its own: a scenario is addressed by its position
/// in the [`ScenarioCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    pub title: String,
    pub story: String,
    #[serde(default)]
    pub strong_signals: Vec<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl ScenarioDefinition {
    /// Create a scenario with no signals or choices
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, story: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            story: story.into(),
            strong_signals: Vec::new(),
            choices: Vec::new(),
        }
    }

    /// Add a strong signal
    #[inline]
    #[must_use]
    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.strong_signals.push(signal.into());
        self
    }

    /// Add a choice
    #[inline]
    #[must_use]
    pub fn with_choice(mut self, text: impl Into<String>, consequence: impl Into<String>) -> Self {
        self.choices.push(Choice {
            text: text.into(),
            consequence: consequence.into(),
        });
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Wrapped { scenarios: Vec<ScenarioDefinition> },
    Bare(Vec<ScenarioDefinition>),
}

/// Ordered, non-empty, read-only scenario collection
///
/// Cloning is cheap; the scenarios are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioCatalog {
    scenarios: Arc<[ScenarioDefinition]>,
}

impl ScenarioCatalog {
    /// Build a catalog from already-decoded scenarios
    ///
    /// # Errors
    /// `CatalogError::Empty` when `scenarios` is empty.
    pub fn new(scenarios: Vec<ScenarioDefinition>) -> Result<Self, CatalogError> {
        if scenarios.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            scenarios: scenarios.into(),
        })
    }

    /// Decode a catalog document.
    ///
    /// Accepts `{"scenarios": [...]}` as well as a bare array.
    ///
    /// # Errors
    /// - `CatalogError::Malformed` if the text is not a scenario collection
    /// - `CatalogError::Empty` if it holds no scenarios
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let scenarios = match serde_json::from_str::<CatalogDocument>(text)? {
            CatalogDocument::Wrapped { scenarios } | CatalogDocument::Bare(scenarios) => scenarios,
        };
        Self::new(scenarios)
    }

    /// One-shot fetch of the catalog from its source
    ///
    /// # Errors
    /// Any [`CatalogError`]; callers treat this as fatal for session start.
    pub async fn load(source: &CatalogSource) -> Result<Self, CatalogError> {
        let text = source.fetch().await?;
        let catalog = Self::from_json(&text)?;
        tracing::info!(source = %source, scenarios = catalog.len(), "scenario catalog loaded");
        Ok(catalog)
    }

    /// Scenario at `index`
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ScenarioDefinition> {
        self.scenarios.get(index)
    }

    /// First scenario whose title matches exactly, with its index
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<(usize, &ScenarioDefinition)> {
        self.scenarios
            .iter()
            .enumerate()
            .find(|(_, s)| s.title == title)
    }

    /// Number of scenarios (never zero)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Always `false`; present for API symmetry
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Iterate scenarios in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.scenarios.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "scenarios": [
            {
                "title": "Deepfake Tip",
                "story": "A viral clip arrives an hour before deadline.",
                "strongSignals": ["unverified source", "time pressure"],
                "choices": [
                    {"text": "Publish now", "consequence": "First, but maybe wrong"},
                    {"text": "Hold for verification", "consequence": "Slower, but defensible"}
                ]
            },
            {
                "title": "Automated Obituaries",
                "story": "A vendor offers AI-written obituaries."
            }
        ]
    }"#;

    #[test]
    fn decodes_wrapped_document() {
        let catalog = ScenarioCatalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let first = catalog.get(0).unwrap();
        assert_eq!(first.title, "Deepfake Tip");
        assert_eq!(first.strong_signals, vec!["unverified source", "time pressure"]);
        assert_eq!(first.choices[1].consequence, "Slower, but defensible");
    }

    #[test]
    fn missing_signals_and_choices_default_to_empty() {
        let catalog = ScenarioCatalog::from_json(CATALOG).unwrap();
        let second = catalog.get(1).unwrap();
        assert!(second.strong_signals.is_empty());
        assert!(second.choices.is_empty());
    }

    #[test]
    fn decodes_bare_array() {
        let catalog =
            ScenarioCatalog::from_json(r#"[{"title": "Only", "story": "One story"}]"#).unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = ScenarioCatalog::from_json(r#"{"scenarios": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Empty));
    }

    #[test]
    fn malformed_catalog_is_rejected() {
        let err = ScenarioCatalog::from_json(r#"{"scenarios": 7}"#).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn find_by_title_returns_position() {
        let catalog = ScenarioCatalog::from_json(CATALOG).unwrap();
        let (index, scenario) = catalog.find_by_title("Automated Obituaries").unwrap();
        assert_eq!(index, 1);
        assert_eq!(scenario.story, "A vendor offers AI-written obituaries.");
        assert!(catalog.find_by_title("Nope").is_none());
    }

    #[test]
    fn serializes_with_catalog_field_names() {
        let scenario = ScenarioDefinition::new("T", "S").with_signal("sig");
        let json = serde_json::to_value(&scenario).unwrap();
        assert_eq!(json["strongSignals"][0], "sig");
    }
}
