//! Step state machine
//!
//! Steps run `Welcome → Selection → Ethics → Safeguards → Reflection → Summary`.
//! Preconditions are pure predicates over [`Session`]; the presentation
//! layer queries them instead of inferring progress from its widgets.

use crate::error::FlowError;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Position in the exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Welcome,
    Selection,
    Ethics,
    Safeguards,
    Reflection,
    Summary,
}

impl Step {
    /// Every step in flow order
    pub const ALL: [Step; 6] = [
        Step::Welcome,
        Step::Selection,
        Step::Ethics,
        Step::Safeguards,
        Step::Reflection,
        Step::Summary,
    ];

    /// Zero-based position in the flow
    #[inline]
    #[must_use]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn next(self) -> Option<Step> {
        Self::ALL.get(self.ordinal() + 1).copied()
    }

    #[must_use]
    pub fn previous(self) -> Option<Step> {
        self.ordinal().checked_sub(1).map(|i| Self::ALL[i])
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Step::Welcome => "welcome",
            Step::Selection => "selection",
            Step::Ethics => "ethics",
            Step::Safeguards => "safeguards",
            Step::Reflection => "reflection",
            Step::Summary => "summary",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown step name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown step '{0}'")]
pub struct ParseStepError(pub String);

impl FromStr for Step {
    type Err = ParseStepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|step| step.name() == wanted)
            .ok_or(ParseStepError(wanted))
    }
}

/// Why a step cannot be left forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blocker {
    MissingTeam,
    MissingScenario,
    NoIssues,
    NoSafeguards,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Blocker::MissingTeam => "a team name is required",
            Blocker::MissingScenario => "a scenario must be chosen",
            Blocker::NoIssues => "at least one issue must be identified",
            Blocker::NoSafeguards => "at least one safeguard must be proposed",
        };
        f.write_str(text)
    }
}

/// Unmet precondition for leaving `step` forward, if any
#[must_use]
pub fn blocked_reason(step: Step, session: &Session) -> Option<Blocker> {
    match step {
        Step::Welcome => session.team().is_none().then_some(Blocker::MissingTeam),
        Step::Selection => session.work().is_none().then_some(Blocker::MissingScenario),
        Step::Ethics => match session.work() {
            None => Some(Blocker::MissingScenario),
            Some(work) if work.issues().is_empty() => Some(Blocker::NoIssues),
            Some(_) => None,
        },
        Step::Safeguards => match session.work() {
            None => Some(Blocker::MissingScenario),
            Some(work) if work.safeguards().is_empty() => Some(Blocker::NoSafeguards),
            Some(_) => None,
        },
        Step::Reflection | Step::Summary => None,
    }
}

/// Whether `step` may be left forward
#[inline]
#[must_use]
pub fn can_leave(step: Step, session: &Session) -> bool {
    blocked_reason(step, session).is_none()
}

/// Whether `step` is reachable from `Welcome` with the data present
#[must_use]
pub fn can_enter(step: Step, session: &Session) -> bool {
    Step::ALL
        .into_iter()
        .take_while(|s| *s < step)
        .all(|s| can_leave(s, session))
}

/// Validates a move between steps.
///
/// Backward moves are always allowed and never touch data. Forward moves
/// must satisfy the precondition of every step they pass.
///
/// # Errors
/// `FlowError::Blocked` naming the first unmet precondition.
pub fn validate_transition(from: Step, to: Step, session: &Session) -> Result<(), FlowError> {
    if to <= from {
        return Ok(());
    }
    for step in Step::ALL[from.ordinal()..to.ordinal()].iter().copied() {
        if let Some(blocker) = blocked_reason(step, session) {
            return Err(FlowError::Blocked { from, to, blocker });
        }
    }
    Ok(())
}

/// Steps reachable from `from` in one move
#[must_use]
pub fn allowed_transitions(from: Step, session: &Session) -> Vec<Step> {
    Step::ALL
        .into_iter()
        .filter(|to| *to != from && validate_transition(from, *to, session).is_ok())
        .collect()
}

/// Furthest step supported by the data present.
///
/// A returning team resumes where its recorded data stops, not where it
/// last navigated: written reflection resumes at `Summary`, then any
/// safeguard at `Reflection`, then any issue at `Safeguards`, else
/// `Ethics`. Without a scenario the team resumes at `Selection`, and
/// without a team at `Welcome`.
#[must_use]
pub fn resume_step(session: &Session) -> Step {
    match session {
        Session::Empty => Step::Welcome,
        Session::Named { .. } => Step::Selection,
        Session::Active { work, .. } => {
            if work.reflection().has_written_answer() {
                Step::Summary
            } else if !work.safeguards().is_empty() {
                Step::Reflection
            } else if !work.issues().is_empty() {
                Step::Safeguards
            } else {
                Step::Ethics
            }
        }
    }
}
