//! Plain-text summary for terminals

use crate::error::ReportError;
use crate::REPORT_TITLE;
use ethos_session::Session;
use std::fmt::Write;

/// Render `session` as plain text
///
/// # Errors
/// `ReportError::NothingToExport` unless a scenario is in progress.
pub fn render_text(session: &Session) -> Result<String, ReportError> {
    let (Some(team), Some(work)) = (session.team(), session.work()) else {
        return Err(ReportError::NothingToExport);
    };
    let reflection = work.reflection();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{REPORT_TITLE} - {}", team.as_str());
    let _ = writeln!(out, "\nSelected Scenario: {}", work.scenario().title);

    let _ = writeln!(out, "\nEthical Issues Identified");
    for issue in work.issues() {
        let _ = writeln!(out, "  - {issue}");
    }

    let _ = writeln!(out, "\nProposed Safeguards & Guidelines");
    for safeguard in work.safeguards() {
        if safeguard.tags().is_empty() {
            let _ = writeln!(out, "  - {}", safeguard.text());
        } else {
            let tags: Vec<&str> = safeguard.tags().iter().map(String::as_str).collect();
            let _ = writeln!(out, "  - [{}] {}", tags.join("] ["), safeguard.text());
        }
    }

    if !reflection.is_empty() {
        let _ = writeln!(out, "\nTeam Reflection");
        if let Some(hardest) = reflection.hardest() {
            let _ = writeln!(out, "  Hardest decision: {hardest}");
        }
        if let Some(disagreement) = reflection.disagreement() {
            let _ = writeln!(out, "  Points of disagreement: {disagreement}");
        }
        if let Some(confidence) = reflection.confidence() {
            let _ = writeln!(out, "  Confidence level: {}/5", confidence.value());
        }
    }

    Ok(out)
}
