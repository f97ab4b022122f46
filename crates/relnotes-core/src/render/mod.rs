//! Output renderers for a release section.
//!
//! Two independent paths consume the same [`ReleaseSection`]:
//!
//! - HTML: each item is normalized for [`Target::Html`], then escaped and
//!   assembled into a `<ul>` by [`html::render`].
//! - Markdown: the whole section is normalized at once by
//!   [`normalize_block`] and emitted by [`markdown::render`].

pub mod html;

pub mod markdown;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::autolink::IssueTracker;
use crate::changelog::ReleaseSection;
use crate::normalize::{Target, normalize_block, normalize_paragraph};

/// Output format for rendered release notes.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// An HTML `<ul>` fragment.
    #[default]
    Html,
    /// Markdown text with inline issue links.
    Markdown,
}

impl OutputFormat {
    /// Returns the format name as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A finished rendering of one release section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    /// Version of the rendered release.
    pub version: String,
    /// Format of `notes`.
    pub format: OutputFormat,
    /// The rendered text.
    pub notes: String,
}

/// Render a release section in the given format.
pub fn render_section(
    section: &ReleaseSection,
    format: OutputFormat,
    tracker: &IssueTracker,
) -> RenderedOutput {
    debug!(version = %section.version, %format, "rendering release section");

    let notes = match format {
        OutputFormat::Html => {
            let items: Vec<String> = section
                .items
                .iter()
                .map(|item| normalize_paragraph(item.trim(), Target::Html, tracker))
                .collect();
            html::render(&items)
        }
        OutputFormat::Markdown => markdown::render(normalize_block(&section.text, tracker)),
    };

    RenderedOutput {
        version: section.version.clone(),
        format,
        notes,
    }
}
