//! Paragraph normalization and reference autolinking.
//!
//! Normalization collapses a block of changelog prose into a single paragraph
//! and links issue references in the form the target format needs:
//!
//! - [`Target::Markdown`] gets final `[label](url)` links.
//! - [`Target::Html`] gets *placeholder* anchors delimited by private-use
//!   sentinel characters. They pass through HTML escaping intact and are
//!   turned into real tags by [`crate::render::html`] afterwards.

use crate::autolink::IssueTracker;
use crate::changelog::ITEM_MARKER;

/// Opens a placeholder tag. Never produced by HTML escaping.
pub const PLACEHOLDER_OPEN: char = '\u{E000}';

/// Closes a placeholder tag. Never produced by HTML escaping.
pub const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// The format a normalized paragraph is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Placeholder anchors, to be escaped and recovered by the HTML renderer.
    Html,
    /// Inline Markdown links.
    Markdown,
}

/// Normalize one block of text into a single autolinked paragraph.
///
/// Steps, in order: newlines become spaces, runs of spaces collapse to one,
/// references are autolinked for `target`, and the result is trimmed.
pub fn normalize_paragraph(text: &str, target: Target, tracker: &IssueTracker) -> String {
    let mut text = match target {
        // Author text must never carry sentinels into the escaping pass.
        Target::Html => strip_sentinels(text),
        Target::Markdown => text.to_string(),
    };

    text = text.replace('\n', " ");
    while text.contains("  ") {
        text = text.replace("  ", " ");
    }

    let linked = match target {
        Target::Html => tracker.replace_references(&text, |reference, url| {
            placeholder_anchor(url, &reference.label())
        }),
        Target::Markdown => tracker.replace_references(&text, |reference, url| {
            format!("[{}]({url})", reference.label())
        }),
    };

    linked.trim().to_string()
}

/// Normalize a whole release section for Markdown output.
///
/// Line breaks that start a new item are kept so the list stays a list; all
/// other line breaks (continuations, blank lines) collapse into the current
/// line. Each resulting line is normalized with [`Target::Markdown`].
pub fn normalize_block(text: &str, tracker: &IssueTracker) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        match lines.last_mut() {
            Some(current) if !line.starts_with(ITEM_MARKER) => {
                current.push('\n');
                current.push_str(line);
            }
            _ => lines.push(line.to_string()),
        }
    }

    lines
        .iter()
        .map(|line| normalize_paragraph(line, Target::Markdown, tracker))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build a placeholder anchor: `⟨a href="url"⟩label⟨/a⟩` with sentinel brackets.
fn placeholder_anchor(url: &str, label: &str) -> String {
    format!(
        "{PLACEHOLDER_OPEN}a href=\"{url}\"{PLACEHOLDER_CLOSE}{label}{PLACEHOLDER_OPEN}/a{PLACEHOLDER_CLOSE}"
    )
}

fn strip_sentinels(text: &str) -> String {
    text.chars()
        .filter(|&c| c != PLACEHOLDER_OPEN && c != PLACEHOLDER_CLOSE)
        .collect()
}
