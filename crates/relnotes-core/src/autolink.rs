//! Issue-tracker reference recognition.
//!
//! Recognized forms (case-insensitive): `bug #123`, `issue #123`, `GH-123`.
//! The matched prefix is kept verbatim in the link label; only the digits are
//! used to build the target URL.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

use crate::normalize::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// Default issue tracker base URL; the issue id is appended to it.
pub const DEFAULT_ISSUE_URL: &str = "https://github.com/phusion/passenger/issues/";

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(bug #|issue #|GH-)(\d+)").expect("Invalid issue reference regex")
});

/// A tracker base URL that cannot be embedded in an `href` or a Markdown link.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid issue tracker URL {url:?}: must not contain {offending:?}")]
pub struct InvalidIssueUrl {
    /// The rejected base URL.
    pub url: String,
    /// First character that disqualified it.
    pub offending: char,
}

/// A recognized issue reference in changelog prose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkReference<'a> {
    /// Matched prefix exactly as written (e.g. `Bug #`, `gh-`).
    pub prefix: &'a str,
    /// Issue number digits.
    pub id: &'a str,
}

impl LinkReference<'_> {
    /// Visible link text: the original matched text.
    pub fn label(&self) -> String {
        format!("{}{}", self.prefix, self.id)
    }
}

/// Builds issue URLs from a configurable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTracker {
    base_url: String,
}

impl Default for IssueTracker {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ISSUE_URL.to_string(),
        }
    }
}

impl IssueTracker {
    /// Create a tracker; a trailing `/` is added to `base_url` if missing.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidIssueUrl`] if `base_url` contains whitespace, a
    /// quote, an angle bracket, or a placeholder sentinel. Recovered HTML
    /// anchors carry the URL unescaped, so any of these would break out of
    /// the `href` attribute.
    pub fn new(base_url: impl Into<String>) -> Result<Self, InvalidIssueUrl> {
        let mut base_url = base_url.into();
        if let Some(offending) = base_url.chars().find(|&c| is_forbidden_in_url(c)) {
            return Err(InvalidIssueUrl {
                url: base_url,
                offending,
            });
        }
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { base_url })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL for a single issue id.
    pub fn url_for(&self, id: &str) -> String {
        format!("{}{id}", self.base_url)
    }

    /// Replace every reference in `text` with the output of `link`.
    ///
    /// `link` receives the reference and its URL. Text that does not match a
    /// recognized form is left untouched.
    pub fn replace_references<F>(&self, text: &str, mut link: F) -> String
    where
        F: FnMut(&LinkReference<'_>, &str) -> String,
    {
        REFERENCE_RE
            .replace_all(text, |caps: &Captures<'_>| {
                let reference = LinkReference {
                    prefix: caps.get(1).map_or("", |m| m.as_str()),
                    id: caps.get(2).map_or("", |m| m.as_str()),
                };
                let url = self.url_for(reference.id);
                link(&reference, &url)
            })
            .into_owned()
    }
}

fn is_forbidden_in_url(c: char) -> bool {
    c.is_whitespace()
        || c.is_control()
        || matches!(c, '"' | '\'' | '<' | '>' | PLACEHOLDER_OPEN | PLACEHOLDER_CLOSE)
}

/// Collect every reference in `text`, in order of appearance.
pub fn find_references(text: &str) -> Vec<LinkReference<'_>> {
    REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            Some(LinkReference {
                prefix: caps.get(1)?.as_str(),
                id: caps.get(2)?.as_str(),
            })
        })
        .collect()
}
