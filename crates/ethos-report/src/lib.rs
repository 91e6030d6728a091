//! Ethos Report
//!
//! Turns a session into something a team can keep:
//!
//! - [`render_html`]: a standalone HTML document, styled inline, safe to
//!   open offline
//! - [`render_text`]: the same content for a terminal
//! - [`export_file_name`]: the suggested download name
//!
//! User-entered text never reaches the HTML unescaped; the body is assembled
//! as `pulldown-cmark` events and rendered by its HTML writer.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod html;
pub mod text;

pub use error::ReportError;
pub use html::render_html;
pub use text::render_text;

/// Heading shared by every rendering
pub const REPORT_TITLE: &str = "Future Ethics Roadmap";

/// `Future-Ethics-Report-<team>.html` with each whitespace run replaced by `-`
#[must_use]
pub fn export_file_name(team: &str) -> String {
    let mut slug = String::with_capacity(team.len());
    let mut in_gap = false;
    for c in team.chars() {
        if c.is_whitespace() {
            if !in_gap {
                slug.push('-');
            }
            in_gap = true;
        } else {
            slug.push(c);
            in_gap = false;
        }
    }
    format!("Future-Ethics-Report-{slug}.html")
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
