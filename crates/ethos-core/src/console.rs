//! Text console over a [`FacilitationFlow`]
//!
//! Turns parsed [`FlowCommand`]s into flow calls and renders each step as
//! plain text. Reading input and confirming restarts stay with the caller.

use crate::command::{FlowCommand, HELP};
use crate::error::EthosError;
use crate::facilitation::{FacilitationFlow, StepChange};
use chrono::NaiveDate;
use ethos_remote::{format_safeguard, SubmissionOutcome, SubmissionTicket};
use ethos_report::render_text;
use ethos_session::{Confidence, Step};
use std::fmt::Write;
use std::path::{Path, PathBuf};

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show this text
    Show(String),
    /// Ask before calling [`Console::confirm_restart`]
    ConfirmRestart,
    /// Leave the loop
    Quit,
}

/// Interactive driver for one flow
#[derive(Debug)]
pub struct Console {
    flow: FacilitationFlow,
    export_dir: PathBuf,
    pending: Vec<SubmissionTicket>,
}

impl Console {
    /// Console whose default export location is `export_dir`
    #[must_use]
    pub fn new(flow: FacilitationFlow, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            flow,
            export_dir: export_dir.into(),
            pending: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn flow(&self) -> &FacilitationFlow {
        &self.flow
    }

    /// Greeting for a fresh or restored flow
    #[must_use]
    pub fn greeting(&self) -> String {
        let mut out = render_screen(&self.flow);
        if self.flow.is_resumable() {
            if let Some(team) = self.flow.session().team() {
                let _ = write!(out, "\nSaved progress found. Type 'team {team}' to resume.");
            }
        }
        out
    }

    /// Run one command
    ///
    /// # Errors
    /// Flow refusals and export failures; the console stays usable.
    pub fn execute(&mut self, command: FlowCommand, today: NaiveDate) -> Result<Reply, EthosError> {
        let text = match command {
            FlowCommand::Team(name) => {
                let change = self.flow.begin(&name)?;
                self.moved(change)
            }
            FlowCommand::Select(index) => {
                let change = self.flow.select_scenario(index)?;
                self.moved(change)
            }
            FlowCommand::Issue(text) => {
                self.flow.add_issue(&text)?;
                render_screen(&self.flow)
            }
            FlowCommand::Unissue(index) => {
                let removed = self.flow.remove_issue(index)?;
                format!("Removed issue: {removed}\n\n{}", render_screen(&self.flow))
            }
            FlowCommand::Safeguard { text, tags } => {
                self.flow.add_safeguard(&text, &tags)?;
                render_screen(&self.flow)
            }
            FlowCommand::Unsafeguard(index) => {
                let removed = self.flow.remove_safeguard(index)?;
                format!(
                    "Removed safeguard: {}\n\n{}",
                    format_safeguard(&removed),
                    render_screen(&self.flow)
                )
            }
            FlowCommand::Reflect { field, value } => {
                self.flow.set_reflection(field, &value)?;
                render_screen(&self.flow)
            }
            FlowCommand::Next => {
                let change = self.flow.advance()?;
                self.moved(change)
            }
            FlowCommand::Back => {
                let change = self.flow.back()?;
                self.moved(change)
            }
            FlowCommand::GoTo(step) => {
                let change = self.flow.go_to(step)?;
                self.moved(change)
            }
            FlowCommand::Finish => {
                let change = self.flow.finish()?;
                self.moved(change)
            }
            FlowCommand::Status => render_screen(&self.flow),
            FlowCommand::Export(path) => {
                let written = self.export(path.as_deref(), today)?;
                format!("Report written to {}", written.display())
            }
            FlowCommand::Restart => return Ok(Reply::ConfirmRestart),
            FlowCommand::Help => HELP.to_string(),
            FlowCommand::Quit => return Ok(Reply::Quit),
        };
        Ok(Reply::Show(text))
    }

    /// Restart after the user agreed
    pub fn confirm_restart(&mut self) -> String {
        let change = self.flow.restart();
        self.moved(change)
    }

    /// Write the HTML report to `path`, or into the export directory
    ///
    /// # Errors
    /// `Report` before a scenario is chosen, `Io` when the file cannot be
    /// written.
    pub fn export(&self, path: Option<&Path>, today: NaiveDate) -> Result<PathBuf, EthosError> {
        let report = self.flow.export(today)?;
        let target = match path {
            Some(path) if path.is_dir() => path.join(&report.file_name),
            Some(path) => path.to_path_buf(),
            None => self.export_dir.join(&report.file_name),
        };
        std::fs::write(&target, report.html).map_err(|e| EthosError::io_error(&target, e))?;
        tracing::info!(path = %target.display(), "report exported");
        Ok(target)
    }

    /// Wait for submissions still in flight
    pub async fn drain(&mut self) -> Vec<SubmissionOutcome> {
        let mut outcomes = Vec::with_capacity(self.pending.len());
        for ticket in self.pending.drain(..) {
            outcomes.push(ticket.outcome().await);
        }
        outcomes
    }

    fn moved(&mut self, change: StepChange) -> String {
        if let Some(ticket) = change.submission {
            self.pending.retain(SubmissionTicket::is_pending);
            self.pending.push(ticket);
        }
        render_screen(&self.flow)
    }
}

/// One-line summary of a submission outcome, `None` when there is nothing
/// worth telling the user
#[must_use]
pub fn describe_outcome(outcome: &SubmissionOutcome) -> Option<String> {
    match outcome {
        SubmissionOutcome::Skipped => None,
        SubmissionOutcome::Stored { .. } => {
            Some("Results saved to the shared record store.".to_string())
        }
        SubmissionOutcome::Failed { message } => Some(format!(
            "Warning: could not save to the shared record store ({message}). \
             Your work is still saved locally and can be exported."
        )),
    }
}

/// Current step rendered as text
#[must_use]
pub fn render_screen(flow: &FacilitationFlow) -> String {
    let session = flow.session();
    let mut out = String::new();
    let step = flow.step();
    let _ = writeln!(out, "== {} ({}/{}) ==", title(step), step.ordinal() + 1, Step::ALL.len());

    match (step, session.work()) {
        (Step::Welcome, _) => {
            let _ = writeln!(out, "Enter your team name with: team <name>");
        }
        (Step::Selection, _) => {
            if let Some(team) = session.team() {
                let _ = writeln!(out, "Team: {team}");
            }
            for (i, scenario) in flow.catalog().iter().enumerate() {
                let _ = writeln!(out, "  Scenario {}: {}", i + 1, scenario.title);
            }
            let _ = writeln!(out, "Choose one with: select <n>");
        }
        (Step::Ethics, Some(work)) => {
            let scenario = work.scenario();
            let _ = writeln!(out, "{}\n\n{}", scenario.title, scenario.story);
            if !scenario.strong_signals.is_empty() {
                let _ = writeln!(out, "\nStrong signals:");
                for signal in &scenario.strong_signals {
                    let _ = writeln!(out, "  - {signal}");
                }
            }
            if !scenario.choices.is_empty() {
                let _ = writeln!(out, "\nPossible choices:");
                for (i, choice) in scenario.choices.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "  {}. {}\n     {}",
                        i + 1,
                        choice.text,
                        choice.consequence
                    );
                }
            }
            let count = work.issues().len();
            let _ = writeln!(out, "\n{count} issue{} identified", plural(count));
            for (i, issue) in work.issues().iter().enumerate() {
                let _ = writeln!(out, "  {}. {issue}", i + 1);
            }
        }
        (Step::Safeguards, Some(work)) => {
            let _ = writeln!(out, "{}\n\nIssues:", work.scenario().title);
            for issue in work.issues() {
                let _ = writeln!(out, "  - {issue}");
            }
            let count = work.safeguards().len();
            let _ = writeln!(out, "\n{count} safeguard{} added", plural(count));
            for (i, safeguard) in work.safeguards().iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", i + 1, format_safeguard(safeguard));
            }
        }
        (Step::Reflection, Some(work)) => {
            let reflection = work.reflection();
            let _ = writeln!(out, "{}", work.scenario().title);
            let _ = writeln!(out, "  hardest:      {}", reflection.hardest().unwrap_or(""));
            let _ = writeln!(out, "  disagreement: {}", reflection.disagreement().unwrap_or(""));
            let _ = writeln!(
                out,
                "  confidence:   {}/5",
                reflection.confidence().unwrap_or(Confidence::DEFAULT)
            );
            let _ = writeln!(out, "Answer with: reflect <field> <text>, then finish");
        }
        (Step::Summary, Some(_)) => {
            if let Ok(summary) = render_text(session) {
                out.push_str(&summary);
            }
            let _ = writeln!(out, "\nexport [path] saves the report; restart clears everything");
        }
        (_, None) => {
            let _ = writeln!(out, "No scenario selected yet. Use: goto selection");
        }
    }

    if let Some(blocker) = flow.blocker() {
        if step != Step::Welcome {
            let _ = writeln!(out, "(to continue, {blocker})");
        }
    }
    out
}

fn title(step: Step) -> &'static str {
    match step {
        Step::Welcome => "Welcome",
        Step::Selection => "Choose a scenario",
        Step::Ethics => "Identify ethical issues",
        Step::Safeguards => "Propose safeguards",
        Step::Reflection => "Reflect",
        Step::Summary => "Summary",
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
