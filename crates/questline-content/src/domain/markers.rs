//! Destination-marker extraction from rich dialog text.
//!
//! Branching choices are authored as HTML buttons embedded in the dialog body,
//! e.g. `<button data-destination='1_1,2_0'>Ask about fees</button>`. The body
//! is Markdown with inline HTML, so only the raw HTML segments reported by the
//! Markdown parser are scanned; a marker shown inside a code span is text.

use std::sync::LazyLock;

use pulldown_cmark::{Event, Parser};
use regex::Regex;

static DESTINATION_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-destination\s*=\s*(?:'([^']*)'|"([^"]*)")"#)
        .expect("destination attribute pattern is a valid regex")
});

/// Returns every destination attribute value found in the HTML segments of
/// `rich_text`, in document order. Values are returned raw; parsing them into
/// branch paths is the caller's job so it can report the offending dialog.
#[must_use]
pub fn extract_destinations(rich_text: &str) -> Vec<String> {
    let mut html = String::new();
    for event in Parser::new(rich_text) {
        match event {
            Event::Html(fragment) | Event::InlineHtml(fragment) => html.push_str(&fragment),
            _ => html.push('\n'),
        }
    }

    DESTINATION_ATTRIBUTE
        .captures_iter(&html)
        .filter_map(|captures| captures.get(1).or_else(|| captures.get(2)))
        .map(|value| value.as_str().trim().to_owned())
        .collect()
}
