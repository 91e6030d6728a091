//! Standalone HTML report

use crate::error::ReportError;
use crate::REPORT_TITLE;
use chrono::NaiveDate;
use ethos_session::{Safeguard, Session};
use pulldown_cmark::{html, CowStr, Event, HeadingLevel, Tag, TagEnd};

const STYLE: &str = "\
  body { font-family: 'Segoe UI', system-ui, sans-serif; max-width: 700px; margin: 40px auto; padding: 0 24px; color: #1e293b; line-height: 1.6; }
  h1 { color: #1e1b4b; margin-bottom: 4px; }
  .meta { color: #64748b; margin-bottom: 32px; font-size: 14px; }
  h2 { color: #4f46e5; border-bottom: 2px solid #e0e7ff; padding-bottom: 6px; }
  ul { padding-left: 20px; }
  li { margin-bottom: 8px; }
  .tag { display: inline-block; background: #e0e7ff; color: #3730a3; padding: 2px 8px; border-radius: 12px; font-size: 12px; margin-right: 4px; }
  .footer { margin-top: 48px; padding-top: 16px; border-top: 1px solid #e2e8f0; color: #94a3b8; font-size: 12px; }
  @media print { body { margin: 20px; } }
";

const WORKSHOP: &str = "Poynter Institute Workshop";
const FOOTER: &str = "Exported from the Future Ethics Decision Game \u{2022} Poynter Institute";

/// Accumulates body events; every `text` call is escaped on render
#[derive(Default)]
struct Body<'a> {
    events: Vec<Event<'a>>,
}

impl<'a> Body<'a> {
    fn text(&mut self, text: impl Into<CowStr<'a>>) {
        self.events.push(Event::Text(text.into()));
    }

    fn markup(&mut self, raw: &'static str) {
        self.events.push(Event::InlineHtml(CowStr::Borrowed(raw)));
    }

    fn heading(&mut self, level: HeadingLevel, text: impl Into<CowStr<'a>>) {
        self.events.push(Event::Start(Tag::Heading {
            level,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        }));
        self.text(text);
        self.events.push(Event::End(TagEnd::Heading(level)));
    }

    fn paragraph(&mut self, text: impl Into<CowStr<'a>>) {
        self.events.push(Event::Start(Tag::Paragraph));
        self.text(text);
        self.events.push(Event::End(TagEnd::Paragraph));
    }

    fn labelled(&mut self, label: &'static str, value: impl Into<CowStr<'a>>) {
        self.events.push(Event::Start(Tag::Paragraph));
        self.events.push(Event::Start(Tag::Strong));
        self.text(label);
        self.events.push(Event::End(TagEnd::Strong));
        self.text(" ");
        self.text(value);
        self.events.push(Event::End(TagEnd::Paragraph));
    }

    fn list<I, F>(&mut self, items: I, mut item: F)
    where
        I: IntoIterator,
        F: FnMut(&mut Self, I::Item),
    {
        self.events.push(Event::Start(Tag::List(None)));
        for entry in items {
            self.events.push(Event::Start(Tag::Item));
            item(self, entry);
            self.events.push(Event::End(TagEnd::Item));
        }
        self.events.push(Event::End(TagEnd::List(false)));
    }

    fn safeguard(&mut self, safeguard: &'a Safeguard) {
        for tag in safeguard.tags() {
            self.markup(r#"<span class="tag">"#);
            self.text(tag.as_str());
            self.markup("</span>");
        }
        if !safeguard.tags().is_empty() {
            self.events.push(Event::HardBreak);
        }
        self.text(safeguard.text());
    }

    fn render(self) -> String {
        let mut out = String::new();
        html::push_html(&mut out, self.events.into_iter());
        out
    }
}

fn escape(text: &str) -> String {
    let mut out = String::new();
    html::push_html(&mut out, std::iter::once(Event::Text(CowStr::Borrowed(text))));
    out
}

/// Render `session` as a self-contained HTML document dated `date`
///
/// # Errors
/// `ReportError::NothingToExport` unless a scenario is in progress.
pub fn render_html(session: &Session, date: NaiveDate) -> Result<String, ReportError> {
    let (Some(team), Some(work)) = (session.team(), session.work()) else {
        return Err(ReportError::NothingToExport);
    };
    let team = team.as_str();
    let scenario = work.scenario();
    let reflection = work.reflection();

    let mut body = Body::default();
    body.heading(HeadingLevel::H1, REPORT_TITLE);

    body.heading(HeadingLevel::H2, format!("Scenario: {}", scenario.title));
    body.paragraph(scenario.story.as_str());

    body.heading(HeadingLevel::H2, "Ethical Issues Identified");
    body.list(work.issues(), |b, issue| b.text(issue.as_str()));

    body.heading(HeadingLevel::H2, "Proposed Safeguards & Guidelines");
    body.list(work.safeguards(), Body::safeguard);

    if !reflection.is_empty() {
        body.heading(HeadingLevel::H2, "Team Reflection");
        if let Some(hardest) = reflection.hardest() {
            body.labelled("Hardest decision:", hardest);
        }
        if let Some(disagreement) = reflection.disagreement() {
            body.labelled("Points of disagreement:", disagreement);
        }
        if let Some(confidence) = reflection.confidence() {
            body.labelled("Confidence level:", format!("{} / 5", confidence.value()));
        }
    }

    let date = date.format("%B %-d, %Y").to_string();
    let team = escape(team);
    let document = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"UTF-8\">\n\
         <title>Future Ethics Report - {team}</title>\n\
         <style>\n{STYLE}</style>\n\
         </head>\n\
         <body>\n\
         <div class=\"meta\">{team} &bull; {date} &bull; {WORKSHOP}</div>\n\
         {body}\
         <div class=\"footer\">{footer}</div>\n\
         </body>\n\
         </html>\n",
        body = body.render(),
        footer = escape(FOOTER),
    );

    tracing::debug!(team = %team, bytes = document.len(), "rendered html report");
    Ok(document)
}
