//! Facilitation flow: the single owner of a team's session

use chrono::NaiveDate;
use ethos_remote::{SubmissionTicket, Submitter};
use ethos_report::{export_file_name, render_html, ReportError};
use ethos_scenario::ScenarioCatalog;
use ethos_session::{
    blocked_reason, resume_step, validate_transition, Blocker, FlowError, ReflectionField,
    Safeguard, Session, Step, TeamChange,
};
use ethos_store::Persistence;

/// Result of a step change
#[derive(Debug)]
pub struct StepChange {
    pub from: Step,
    pub to: Step,
    /// Present when the move arrived at [`Step::Summary`]
    pub submission: Option<SubmissionTicket>,
}

impl StepChange {
    #[inline]
    #[must_use]
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Rendered report ready to be written somewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub file_name: String,
    pub html: String,
}

/// Drives one team through the exercise
///
/// Owns the session and the current step. Mutations are accepted only in
/// the step that owns them, each successful one is saved, and every
/// arrival at the summary starts exactly one remote submission.
#[derive(Debug)]
pub struct FacilitationFlow {
    catalog: ScenarioCatalog,
    session: Session,
    step: Step,
    persistence: Persistence,
    submitter: Submitter,
}

impl FacilitationFlow {
    /// Fresh flow with an empty session at [`Step::Welcome`]
    #[must_use]
    pub fn new(catalog: ScenarioCatalog, persistence: Persistence, submitter: Submitter) -> Self {
        Self {
            catalog,
            session: Session::new(),
            step: Step::Welcome,
            persistence,
            submitter,
        }
    }

    /// Flow restored from persisted state, waiting at [`Step::Welcome`]
    ///
    /// A restored team name is kept so [`begin`](Self::begin) with the same
    /// name resumes; resumption itself happens there.
    #[must_use]
    pub fn open(catalog: ScenarioCatalog, persistence: Persistence, submitter: Submitter) -> Self {
        let session = persistence.load(&catalog);
        if let Some(team) = session.team() {
            tracing::info!(
                team = %team,
                has_scenario = session.has_scenario(),
                "found saved session"
            );
        }
        Self {
            session,
            ..Self::new(catalog, persistence, submitter)
        }
    }

    #[inline]
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[inline]
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    /// Whether a saved team is waiting to resume
    #[inline]
    #[must_use]
    pub fn is_resumable(&self) -> bool {
        self.step == Step::Welcome && self.session.team().is_some()
    }

    /// Whether [`advance`](Self::advance) would succeed
    #[must_use]
    pub fn can_advance(&self) -> bool {
        self.step.next().is_some() && self.blocker().is_none()
    }

    /// Unmet precondition for leaving the current step forward
    #[must_use]
    pub fn blocker(&self) -> Option<Blocker> {
        blocked_reason(self.step, &self.session)
    }

    /// Set the team and jump to where its data stops.
    ///
    /// A different name discards the previous team's work.
    ///
    /// # Errors
    /// `ActionUnavailable` outside `Welcome`; `Blank` for a blank
    /// name.
    pub fn begin(&mut self, team: &str) -> Result<StepChange, FlowError> {
        self.require(Step::Welcome, "begin")?;
        match self.session.set_team_name(team)? {
            TeamChange::Replaced {
                discarded_progress: true,
            } => tracing::info!("new team name; previous progress discarded"),
            TeamChange::Unchanged => tracing::info!("resuming saved session"),
            _ => {}
        }
        self.persist();
        Ok(self.arrive(resume_step(&self.session)))
    }

    /// Choose the scenario at `index` and move on to `Ethics`.
    ///
    /// # Errors
    /// `ActionUnavailable` outside `Selection`; `UnknownScenario` for an
    /// index outside the catalog.
    pub fn select_scenario(&mut self, index: usize) -> Result<StepChange, FlowError> {
        self.require(Step::Selection, "select scenario")?;
        let scenario = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(FlowError::UnknownScenario {
                index,
                len: self.catalog.len(),
            })?;
        tracing::info!(index, title = %scenario.title, "scenario selected");
        self.session.select_scenario(index, scenario)?;
        self.persist();
        Ok(self.arrive(Step::Ethics))
    }

    /// # Errors
    /// `ActionUnavailable` outside `Ethics`; `Blank` for blank text.
    pub fn add_issue(&mut self, text: &str) -> Result<(), FlowError> {
        self.require(Step::Ethics, "add issue")?;
        self.session.add_issue(text)?;
        self.persist();
        Ok(())
    }

    /// # Errors
    /// `ActionUnavailable` outside `Ethics`; `IndexOutOfRange`.
    pub fn remove_issue(&mut self, index: usize) -> Result<String, FlowError> {
        self.require(Step::Ethics, "remove issue")?;
        let removed = self.session.remove_issue(index)?;
        self.persist();
        Ok(removed)
    }

    /// # Errors
    /// `ActionUnavailable` outside `Safeguards`; `Blank` for blank
    /// text.
    pub fn add_safeguard<I, T>(&mut self, text: &str, tags: I) -> Result<(), FlowError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.require(Step::Safeguards, "add safeguard")?;
        self.session.add_safeguard(text, tags)?;
        self.persist();
        Ok(())
    }

    /// # Errors
    /// `ActionUnavailable` outside `Safeguards`; `IndexOutOfRange`.
    pub fn remove_safeguard(&mut self, index: usize) -> Result<Safeguard, FlowError> {
        self.require(Step::Safeguards, "remove safeguard")?;
        let removed = self.session.remove_safeguard(index)?;
        self.persist();
        Ok(removed)
    }

    /// # Errors
    /// `ActionUnavailable` outside `Reflection`; `InvalidInput` for a bad
    /// confidence.
    pub fn set_reflection(&mut self, field: ReflectionField, value: &str) -> Result<(), FlowError> {
        self.require(Step::Reflection, "reflect")?;
        self.session.set_reflection_field(field, value)?;
        self.persist();
        Ok(())
    }

    /// Move one step forward.
    ///
    /// # Errors
    /// `NoNextStep` at `Summary`; `Blocked` when the current step's
    /// precondition is unmet.
    pub fn advance(&mut self) -> Result<StepChange, FlowError> {
        let next = self.step.next().ok_or(FlowError::NoNextStep(self.step))?;
        validate_transition(self.step, next, &self.session)?;
        Ok(self.arrive(next))
    }

    /// Move one step back. Data ahead is kept.
    ///
    /// # Errors
    /// `NoPreviousStep` at `Welcome`.
    pub fn back(&mut self) -> Result<StepChange, FlowError> {
        let previous = self
            .step
            .previous()
            .ok_or(FlowError::NoPreviousStep(self.step))?;
        Ok(self.arrive(previous))
    }

    /// Jump to `to`; forward jumps must satisfy every step passed.
    ///
    /// # Errors
    /// `Blocked` naming the first unmet precondition.
    pub fn go_to(&mut self, to: Step) -> Result<StepChange, FlowError> {
        validate_transition(self.step, to, &self.session)?;
        Ok(self.arrive(to))
    }

    /// Finish from `Reflection`: go to the summary and submit.
    ///
    /// # Errors
    /// `ActionUnavailable` outside `Reflection`.
    pub fn finish(&mut self) -> Result<StepChange, FlowError> {
        self.require(Step::Reflection, "finish")?;
        Ok(self.arrive(Step::Summary))
    }

    /// Forget the team and its work, locally and in storage, and return to
    /// `Welcome`. Confirmation belongs to the caller.
    pub fn restart(&mut self) -> StepChange {
        self.session.clear();
        self.persistence.clear();
        tracing::info!("session cleared");
        self.arrive(Step::Welcome)
    }

    /// Render the HTML report dated `date`
    ///
    /// # Errors
    /// `ReportError::NothingToExport` before a scenario is chosen.
    pub fn export(&self, date: NaiveDate) -> Result<ExportedReport, ReportError> {
        let html = render_html(&self.session, date)?;
        let team = self
            .session
            .team()
            .map(|t| t.as_str())
            .ok_or(ReportError::NothingToExport)?;
        Ok(ExportedReport {
            file_name: export_file_name(team),
            html,
        })
    }

    fn require(&self, step: Step, action: &'static str) -> Result<(), FlowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(FlowError::ActionUnavailable {
                action,
                step: self.step,
            })
        }
    }

    fn persist(&self) {
        let _ = self.persistence.save(&self.session);
    }

    fn arrive(&mut self, to: Step) -> StepChange {
        let from = std::mem::replace(&mut self.step, to);
        if from != to {
            tracing::info!(%from, %to, "step changed");
        }
        let submission = (to == Step::Summary && from != Step::Summary)
            .then(|| self.submitter.submit(&self.session));
        StepChange {
            from,
            to,
            submission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethos_store::MemoryStore;
    use ethos_test_utils::{sample_catalog, session_ready_for, FailingStore};

    fn flow() -> FacilitationFlow {
        FacilitationFlow::new(
            sample_catalog(),
            Persistence::new(MemoryStore::new()),
            Submitter::disabled(),
        )
    }

    fn flow_at(step: Step) -> FacilitationFlow {
        let mut flow = flow();
        flow.session = session_ready_for(step, flow.catalog());
        flow.step = step;
        flow
    }

    #[test]
    fn begin_without_scenario_goes_to_selection() {
        let mut flow = flow();
        let change = flow.begin("  Metro Desk ").unwrap();
        assert_eq!(change.to, Step::Selection);
        assert!(change.submission.is_none());
        assert_eq!(flow.session().team().unwrap().as_str(), "Metro Desk");
    }

    #[test]
    fn blank_team_is_rejected_in_place() {
        let mut flow = flow();
        let err = flow.begin("   ").unwrap_err();
        assert!(err.is_blank_input());
        assert_eq!(flow.step(), Step::Welcome);
    }

    #[test]
    fn mutations_belong_to_their_step() {
        let mut flow = flow_at(Step::Safeguards);
        assert_eq!(
            flow.add_issue("late issue"),
            Err(FlowError::ActionUnavailable {
                action: "add issue",
                step: Step::Safeguards
            })
        );
        assert!(flow.add_safeguard("Editor sign-off", ["Accountability"]).is_ok());
        assert!(matches!(
            flow.set_reflection(ReflectionField::Hardest, "x"),
            Err(FlowError::ActionUnavailable { .. })
        ));
    }

    #[test]
    fn unknown_scenario_index() {
        let mut flow = flow_at(Step::Selection);
        assert_eq!(
            flow.select_scenario(9).unwrap_err(),
            FlowError::UnknownScenario { index: 9, len: 3 }
        );
        assert_eq!(flow.step(), Step::Selection);
    }

    #[test]
    fn advance_is_blocked_until_an_issue_exists() {
        let mut flow = flow_at(Step::Ethics);
        assert!(!flow.can_advance());
        assert_eq!(flow.blocker(), Some(Blocker::NoIssues));
        assert!(matches!(flow.advance(), Err(FlowError::Blocked { .. })));

        flow.add_issue("Consent").unwrap();
        assert!(flow.can_advance());
        assert_eq!(flow.advance().unwrap().to, Step::Safeguards);
    }

    #[test]
    fn back_keeps_data_ahead() {
        let mut flow = flow_at(Step::Reflection);
        flow.back().unwrap();
        flow.back().unwrap();
        assert_eq!(flow.step(), Step::Ethics);
        assert_eq!(flow.session().work().unwrap().safeguards().len(), 1);
    }

    #[test]
    fn back_from_welcome_is_an_error() {
        assert_eq!(
            flow().back().unwrap_err(),
            FlowError::NoPreviousStep(Step::Welcome)
        );
    }

    #[test]
    fn summary_has_no_next_step() {
        let mut flow = flow_at(Step::Summary);
        assert!(!flow.can_advance());
        assert_eq!(flow.advance().unwrap_err(), FlowError::NoNextStep(Step::Summary));
    }

    #[test]
    fn go_to_same_step_is_not_an_arrival() {
        let mut flow = flow_at(Step::Summary);
        let change = flow.go_to(Step::Summary).unwrap();
        assert!(!change.moved());
        assert!(change.submission.is_none());
    }

    #[test]
    fn finish_only_from_reflection() {
        let mut flow = flow_at(Step::Safeguards);
        assert!(matches!(
            flow.finish(),
            Err(FlowError::ActionUnavailable { action: "finish", .. })
        ));
    }

    #[test]
    fn storage_failures_do_not_block_the_flow() {
        let mut flow = FacilitationFlow::new(
            sample_catalog(),
            Persistence::new(FailingStore),
            Submitter::disabled(),
        );
        flow.begin("Desk").unwrap();
        flow.select_scenario(0).unwrap();
        flow.add_issue("Consent").unwrap();
        assert_eq!(flow.session().work().unwrap().issues(), ["Consent"]);
    }

    #[test]
    fn export_needs_a_scenario() {
        let flow = flow_at(Step::Selection);
        assert_eq!(
            flow.export(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
            Err(ReportError::NothingToExport)
        );

        let flow = flow_at(Step::Summary);
        let report = flow.export(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()).unwrap();
        assert_eq!(report.file_name, "Future-Ethics-Report-Test-Team.html");
    }
}
