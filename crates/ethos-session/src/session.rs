//! Session state: team identity plus the in-progress scenario work

use crate::error::SessionError;
use ethos_scenario::{ScenarioCatalog, ScenarioDefinition};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trimmed, non-empty team name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamName(String);

impl TeamName {
    /// Trim and validate a raw name
    ///
    /// # Errors
    /// `SessionError::Blank` for empty or whitespace-only input.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::Blank("team name"));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamName {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TeamName> for String {
    fn from(value: TeamName) -> Self {
        value.0
    }
}

impl fmt::Display for TeamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Confidence rating, 1 to 5 inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;
    /// Value assumed by consumers when none was recorded
    pub const DEFAULT: Confidence = Confidence(3);

    /// # Errors
    /// `SessionError::InvalidInput` outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, SessionError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SessionError::invalid(format!(
                "confidence must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    #[inline]
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Confidence {
    type Error = SessionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for u8 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team-authored mitigation, optionally tagged
///
/// Tags are an insertion-ordered set. The vocabulary is defined by the
/// presentation layer; any non-empty string is accepted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Safeguard {
    text: String,
    #[serde(default)]
    tags: IndexSet<String>,
}

impl Safeguard {
    /// # Errors
    /// `SessionError::Blank` when `text` is empty after trimming.
    pub fn new<I, T>(text: &str, tags: I) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::Blank("safeguard text"));
        }
        let tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(Self {
            text: text.to_string(),
            tags,
        })
    }

    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }
}

/// Which reflection answer to overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReflectionField {
    Hardest,
    Disagreement,
    Confidence,
}

impl ReflectionField {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hardest => "hardest",
            Self::Disagreement => "disagreement",
            Self::Confidence => "confidence",
        }
    }
}

impl fmt::Display for ReflectionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReflectionField {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardest" => Ok(Self::Hardest),
            "disagreement" => Ok(Self::Disagreement),
            "confidence" => Ok(Self::Confidence),
            other => Err(SessionError::invalid(format!(
                "unknown reflection field '{other}'"
            ))),
        }
    }
}

/// Post-decision reflection; every answer is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hardest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    disagreement: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<Confidence>,
}

impl Reflection {
    #[inline]
    #[must_use]
    pub fn hardest(&self) -> Option<&str> {
        self.hardest.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn disagreement(&self) -> Option<&str> {
        self.disagreement.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn confidence(&self) -> Option<Confidence> {
        self.confidence
    }

    /// True once either written answer holds text
    #[inline]
    #[must_use]
    pub fn has_written_answer(&self) -> bool {
        self.hardest.is_some() || self.disagreement.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_written_answer() && self.confidence.is_none()
    }

    /// Overwrite one field. Whitespace-only text clears it.
    ///
    /// # Errors
    /// `SessionError::InvalidInput` for a confidence that is not an
    /// integer in `1..=5`.
    pub fn set(&mut self, field: ReflectionField, value: &str) -> Result<(), SessionError> {
        match field {
            ReflectionField::Hardest => self.hardest = non_blank(value),
            ReflectionField::Disagreement => self.disagreement = non_blank(value),
            ReflectionField::Confidence => {
                let raw = value.trim();
                self.confidence = if raw.is_empty() {
                    None
                } else {
                    let parsed = raw.parse::<u8>().map_err(|_| {
                        SessionError::invalid(format!("confidence '{raw}' is not a number"))
                    })?;
                    Some(Confidence::new(parsed)?)
                };
            }
        }
        Ok(())
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Work on the chosen scenario
///
/// Created fully initialized by [`Session::select_scenario`]; the scenario
/// itself never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioWork {
    scenario_index: usize,
    scenario: ScenarioDefinition,
    #[serde(default)]
    issues: Vec<String>,
    #[serde(default)]
    safeguards: Vec<Safeguard>,
    #[serde(default)]
    reflection: Reflection,
}

impl ScenarioWork {
    fn new(scenario_index: usize, scenario: ScenarioDefinition) -> Self {
        Self {
            scenario_index,
            scenario,
            issues: Vec::new(),
            safeguards: Vec::new(),
            reflection: Reflection::default(),
        }
    }

    /// Catalog position the scenario was chosen from
    #[inline]
    #[must_use]
    pub fn scenario_index(&self) -> usize {
        self.scenario_index
    }

    #[inline]
    #[must_use]
    pub fn scenario(&self) -> &ScenarioDefinition {
        &self.scenario
    }

    #[inline]
    #[must_use]
    pub fn issues(&self) -> &[String] {
        &self.issues
    }

    #[inline]
    #[must_use]
    pub fn safeguards(&self) -> &[Safeguard] {
        &self.safeguards
    }

    #[inline]
    #[must_use]
    pub fn reflection(&self) -> &Reflection {
        &self.reflection
    }
}

/// Result of [`Session::set_team_name`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamChange {
    /// Same name re-entered; nothing changed
    Unchanged,
    /// First name for this session
    Set,
    /// Different name replaced the old one
    Replaced { discarded_progress: bool },
}

/// Outcome of matching a rehydrated session against a fresh catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rebind {
    /// No scenario in the session
    NoScenario,
    /// Catalog entry at the stored index carries the same title
    Exact,
    /// Found under the same title at another index
    Moved { from: usize, to: usize },
    /// No catalog entry matches; stored copy kept
    Detached,
}

/// One team's progress through the exercise
///
/// The variants make invalid combinations unrepresentable: work on a
/// scenario always belongs to a named team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Session {
    /// Nothing entered yet
    #[default]
    Empty,
    /// Team named, no scenario chosen
    Named { team: TeamName },
    /// Team working on a scenario
    Active { team: TeamName, work: ScenarioWork },
}

impl Session {
    /// Fresh empty session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::Empty
    }

    #[inline]
    #[must_use]
    pub fn team(&self) -> Option<&TeamName> {
        match self {
            Self::Empty => None,
            Self::Named { team } | Self::Active { team, .. } => Some(team),
        }
    }

    #[inline]
    #[must_use]
    pub fn work(&self) -> Option<&ScenarioWork> {
        match self {
            Self::Active { work, .. } => Some(work),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn has_scenario(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    fn work_mut(&mut self) -> Result<&mut ScenarioWork, SessionError> {
        match self {
            Self::Active { work, .. } => Ok(work),
            _ => Err(SessionError::NoScenarioSelected),
        }
    }

    /// Set the team name.
    ///
    /// A different name discards any in-progress scenario: a new team
    /// identity invalidates the previous team's work. Re-entering the same
    /// name changes nothing.
    ///
    /// # Errors
    /// `SessionError::Blank` for an empty name; the session is left
    /// untouched.
    pub fn set_team_name(&mut self, raw: &str) -> Result<TeamChange, SessionError> {
        let name = TeamName::parse(raw)?;
        let change = match self {
            Self::Empty => TeamChange::Set,
            Self::Named { team } | Self::Active { team, .. } if *team == name => {
                return Ok(TeamChange::Unchanged);
            }
            Self::Named { .. } => TeamChange::Replaced {
                discarded_progress: false,
            },
            Self::Active { work, .. } => {
                tracing::debug!(
                    scenario = %work.scenario().title,
                    issues = work.issues().len(),
                    safeguards = work.safeguards().len(),
                    "new team name discards scenario progress"
                );
                TeamChange::Replaced {
                    discarded_progress: true,
                }
            }
        };
        *self = Self::Named { team: name };
        Ok(change)
    }

    /// Start fresh work on `scenario`, replacing any previous work.
    ///
    /// # Errors
    /// `SessionError::NoTeam` before a team name is set.
    pub fn select_scenario(
        &mut self,
        scenario_index: usize,
        scenario: ScenarioDefinition,
    ) -> Result<(), SessionError> {
        let team = self.team().cloned().ok_or(SessionError::NoTeam)?;
        *self = Self::Active {
            team,
            work: ScenarioWork::new(scenario_index, scenario),
        };
        Ok(())
    }

    /// Append a trimmed issue.
    ///
    /// # Errors
    /// `NoScenarioSelected`, or `Blank` for blank text.
    pub fn add_issue(&mut self, text: &str) -> Result<(), SessionError> {
        let work = self.work_mut()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(SessionError::Blank("issue text"));
        }
        work.issues.push(text.to_string());
        Ok(())
    }

    /// Remove the issue at `index`, shifting later issues down.
    ///
    /// # Errors
    /// `NoScenarioSelected` or `IndexOutOfRange`.
    pub fn remove_issue(&mut self, index: usize) -> Result<String, SessionError> {
        let work = self.work_mut()?;
        checked_remove(&mut work.issues, index)
    }

    /// Append a safeguard with its tags.
    ///
    /// # Errors
    /// `NoScenarioSelected`, or `Blank` for blank text.
    pub fn add_safeguard<I, T>(&mut self, text: &str, tags: I) -> Result<(), SessionError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let work = self.work_mut()?;
        work.safeguards.push(Safeguard::new(text, tags)?);
        Ok(())
    }

    /// Remove the safeguard at `index`, shifting later ones down.
    ///
    /// # Errors
    /// `NoScenarioSelected` or `IndexOutOfRange`.
    pub fn remove_safeguard(&mut self, index: usize) -> Result<Safeguard, SessionError> {
        let work = self.work_mut()?;
        checked_remove(&mut work.safeguards, index)
    }

    /// Overwrite one reflection field; the others are untouched.
    ///
    /// # Errors
    /// `NoScenarioSelected`, or `InvalidInput` for a bad confidence.
    pub fn set_reflection_field(
        &mut self,
        field: ReflectionField,
        value: &str,
    ) -> Result<(), SessionError> {
        self.work_mut()?.reflection.set(field, value)
    }

    /// Drop the in-progress scenario, keeping the team name.
    ///
    /// Returns `true` when there was work to discard.
    pub fn reset_progress(&mut self) -> bool {
        match std::mem::take(self) {
            Self::Active { team, .. } => {
                *self = Self::Named { team };
                true
            }
            other => {
                *self = other;
                false
            }
        }
    }

    /// Forget everything, team name included
    #[inline]
    pub fn clear(&mut self) {
        *self = Self::Empty;
    }

    /// Point a rehydrated session's scenario at the freshly loaded catalog.
    ///
    /// The stored copy is replaced by the catalog entry at the stored
    /// index when the titles agree, else by the first entry with the same
    /// title. Without a match the stored copy is kept.
    pub fn rebind(&mut self, catalog: &ScenarioCatalog) -> Rebind {
        let Self::Active { work, .. } = self else {
            return Rebind::NoScenario;
        };

        if let Some(fresh) = catalog
            .get(work.scenario_index)
            .filter(|s| s.title == work.scenario.title)
        {
            work.scenario = fresh.clone();
            return Rebind::Exact;
        }

        match catalog.find_by_title(&work.scenario.title) {
            Some((index, fresh)) => {
                let from = work.scenario_index;
                work.scenario_index = index;
                work.scenario = fresh.clone();
                Rebind::Moved { from, to: index }
            }
            None => Rebind::Detached,
        }
    }
}

fn checked_remove<T>(items: &mut Vec<T>, index: usize) -> Result<T, SessionError> {
    if index >= items.len() {
        return Err(SessionError::IndexOutOfRange {
            index,
            len: items.len(),
        });
    }
    Ok(items.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(title: &str) -> ScenarioDefinition {
        ScenarioDefinition::new(title, format!("{title} story"))
    }

    fn active() -> Session {
        let mut session = Session::new();
        session.set_team_name("Team A").unwrap();
        session.select_scenario(0, scenario("Deepfake")).unwrap();
        session
    }

    #[test]
    fn team_name_is_trimmed() {
        let mut session = Session::new();
        assert_eq!(session.set_team_name("  Team A  "), Ok(TeamChange::Set));
        assert_eq!(session.team().unwrap().as_str(), "Team A");
    }

    #[test]
    fn empty_team_name_is_rejected_without_change() {
        let mut session = active();
        let before = session.clone();
        let err = session.set_team_name("   ").unwrap_err();
        assert_eq!(err, SessionError::Blank("team name"));
        assert_eq!(session, before);
    }

    #[test]
    fn changing_team_discards_progress() {
        let mut session = active();
        session.add_issue("bias").unwrap();

        let change = session.set_team_name("Team B").unwrap();
        assert_eq!(
            change,
            TeamChange::Replaced {
                discarded_progress: true
            }
        );
        assert!(session.work().is_none());
        assert_eq!(session.team().unwrap().as_str(), "Team B");
    }

    #[test]
    fn same_team_keeps_progress() {
        let mut session = active();
        session.add_issue("bias").unwrap();

        assert_eq!(session.set_team_name(" Team A "), Ok(TeamChange::Unchanged));
        assert_eq!(session.work().unwrap().issues(), ["bias"]);
    }

    #[test]
    fn select_requires_team() {
        let mut session = Session::new();
        assert_eq!(
            session.select_scenario(0, scenario("x")),
            Err(SessionError::NoTeam)
        );
        assert_eq!(session, Session::Empty);
    }

    #[test]
    fn select_twice_starts_fresh() {
        let mut session = active();
        session.add_issue("privacy").unwrap();
        session.add_safeguard("review", ["Transparency"]).unwrap();
        session
            .set_reflection_field(ReflectionField::Hardest, "all of it")
            .unwrap();

        session.select_scenario(1, scenario("Obituaries")).unwrap();

        let work = session.work().unwrap();
        assert_eq!(work.scenario().title, "Obituaries");
        assert_eq!(work.scenario_index(), 1);
        assert!(work.issues().is_empty());
        assert!(work.safeguards().is_empty());
        assert!(work.reflection().is_empty());
    }

    #[test]
    fn blank_issue_is_rejected() {
        let mut session = active();
        assert!(matches!(
            session.add_issue(" \t "),
            Err(SessionError::Blank(_))
        ));
        assert!(session.work().unwrap().issues().is_empty());
    }

    #[test]
    fn issue_requires_scenario() {
        let mut session = Session::new();
        session.set_team_name("Team").unwrap();
        assert_eq!(
            session.add_issue("anything"),
            Err(SessionError::NoScenarioSelected)
        );
    }

    #[test]
    fn remove_issue_shifts_remaining() {
        let mut session = active();
        for issue in ["a", "b", "c"] {
            session.add_issue(issue).unwrap();
        }
        assert_eq!(session.remove_issue(1).unwrap(), "b");
        assert_eq!(session.work().unwrap().issues(), ["a", "c"]);
    }

    #[test]
    fn remove_out_of_range_fails() {
        let mut session = active();
        session.add_issue("only").unwrap();
        assert_eq!(
            session.remove_issue(1),
            Err(SessionError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            session.remove_safeguard(0),
            Err(SessionError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn safeguard_tags_deduplicate_and_keep_order() {
        let mut session = active();
        session
            .add_safeguard(
                "  Human review before publishing ",
                ["Accountability", " Transparency", "Accountability", ""],
            )
            .unwrap();

        let safeguard = &session.work().unwrap().safeguards()[0];
        assert_eq!(safeguard.text(), "Human review before publishing");
        let tags: Vec<_> = safeguard.tags().iter().map(String::as_str).collect();
        assert_eq!(tags, ["Accountability", "Transparency"]);
    }

    #[test]
    fn blank_safeguard_is_rejected() {
        let mut session = active();
        let tags: [&str; 0] = [];
        assert!(matches!(
            session.add_safeguard("", tags),
            Err(SessionError::Blank(_))
        ));
    }

    #[test]
    fn reflection_fields_are_independent() {
        let mut session = active();
        session
            .set_reflection_field(ReflectionField::Confidence, "4")
            .unwrap();
        session
            .set_reflection_field(ReflectionField::Disagreement, "speed vs accuracy")
            .unwrap();

        let reflection = session.work().unwrap().reflection();
        assert_eq!(reflection.hardest(), None);
        assert_eq!(reflection.disagreement(), Some("speed vs accuracy"));
        assert_eq!(reflection.confidence().map(Confidence::value), Some(4));
    }

    #[test]
    fn reflection_last_write_wins_and_blank_clears() {
        let mut session = active();
        session
            .set_reflection_field(ReflectionField::Hardest, "first")
            .unwrap();
        session
            .set_reflection_field(ReflectionField::Hardest, "second")
            .unwrap();
        assert_eq!(session.work().unwrap().reflection().hardest(), Some("second"));

        session
            .set_reflection_field(ReflectionField::Hardest, "  ")
            .unwrap();
        assert_eq!(session.work().unwrap().reflection().hardest(), None);
    }

    #[test]
    fn confidence_out_of_range_is_rejected() {
        let mut session = active();
        for bad in ["0", "6", "high"] {
            assert!(matches!(
                session.set_reflection_field(ReflectionField::Confidence, bad),
                Err(SessionError::InvalidInput(_))
            ));
        }
        assert!(session.work().unwrap().reflection().confidence().is_none());
    }

    #[test]
    fn reset_progress_keeps_team() {
        let mut session = active();
        assert!(session.reset_progress());
        assert_eq!(session.team().unwrap().as_str(), "Team A");
        assert!(!session.has_scenario());
        assert!(!session.reset_progress());
    }

    #[test]
    fn clear_forgets_everything() {
        let mut session = active();
        session.clear();
        assert_eq!(session, Session::Empty);
    }

    #[test]
    fn reflection_field_parses() {
        assert_eq!(
            "Hardest".parse::<ReflectionField>(),
            Ok(ReflectionField::Hardest)
        );
        assert!("mood".parse::<ReflectionField>().is_err());
    }

    #[test]
    fn serde_rejects_blank_team() {
        let json = r#"{"phase": "named", "team": "   "}"#;
        assert!(serde_json::from_str::<Session>(json).is_err());
    }

    #[test]
    fn serde_rejects_out_of_range_confidence() {
        let json = r#"{"confidence": 9}"#;
        assert!(serde_json::from_str::<Reflection>(json).is_err());
    }

    #[test]
    fn rebind_prefers_stored_index() {
        let catalog =
            ScenarioCatalog::new(vec![scenario("Deepfake").with_signal("fresh")]).unwrap();
        let mut session = active();

        assert_eq!(session.rebind(&catalog), Rebind::Exact);
        assert_eq!(
            session.work().unwrap().scenario().strong_signals,
            vec!["fresh"]
        );
    }

    #[test]
    fn rebind_follows_title_when_moved() {
        let catalog = ScenarioCatalog::new(vec![scenario("Other"), scenario("Deepfake")]).unwrap();
        let mut session = active();

        assert_eq!(session.rebind(&catalog), Rebind::Moved { from: 0, to: 1 });
        assert_eq!(session.work().unwrap().scenario_index(), 1);
    }

    #[test]
    fn rebind_keeps_copy_when_missing() {
        let catalog = ScenarioCatalog::new(vec![scenario("Other")]).unwrap();
        let mut session = active();

        assert_eq!(session.rebind(&catalog), Rebind::Detached);
        assert_eq!(session.work().unwrap().scenario().title, "Deepfake");
    }
}
