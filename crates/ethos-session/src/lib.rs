//! Ethos Session
//!
//! The mutable record of one team's progress and the step state machine
//! that reads it.
//!
//! - [`Session`]: `Empty | Named | Active`, so a scenario can never exist
//!   without a team and a reflection can never exist without a scenario
//! - [`ScenarioWork`]: chosen scenario plus issues, safeguards, reflection
//! - [`flow`]: [`Step`], precondition predicates, transition validation and
//!   data-driven resumption
//!
//! Nothing here performs I/O. Persistence, remote submission and
//! rendering consume these types from their own crates.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod flow;
pub mod session;

pub use error::{FlowError, SessionError};
pub use flow::{
    allowed_transitions, blocked_reason, can_enter, can_leave, resume_step, validate_transition,
    Blocker, ParseStepError, Step,
};
pub use session::{
    Confidence, Rebind, Reflection, ReflectionField, Safeguard, ScenarioWork, Session, TeamChange,
    TeamName,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
