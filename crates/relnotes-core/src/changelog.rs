//! Changelog parsing: isolate the latest release and split it into items.
//!
//! The changelog is a plain-text, append-only log in this shape:
//!
//! ```text
//! Release 1.2.0
//! -------------
//!
//!  * Text.
//!  * A longer entry.
//!    With a continuation line.
//!
//! Release 1.1.0
//! -------------
//! ...
//!
//! Older releases
//! --------------
//! ```
//!
//! Only the first (most recent) section is ever extracted. Section detection is
//! a two-boundary scan: find the first release header, then the next boundary
//! of either kind.

use std::sync::LazyLock;

use camino::Utf8Path;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Word that introduces a release header.
const RELEASE_KEYWORD: &str = "Release";

/// Line prefix that ends the list of detailed releases.
const OLDER_RELEASES_PREFIX: &str = "Older releases";

/// Marker that starts a change item at the beginning of a line.
pub const ITEM_MARKER: &str = " * ";

/// Splits at every line-start item marker, consuming the marker.
static ITEM_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^ \* ").expect("Invalid item marker regex"));

/// Errors from reading or parsing a changelog.
#[derive(Error, Debug)]
pub enum ChangelogError {
    /// No `Release <version>` header with a dash underline was found.
    #[error("malformed changelog: no release header found")]
    MalformedDocument,

    /// Failed to read the changelog from disk or stdin.
    #[error("failed to read changelog at {path}: {source}")]
    Read {
        /// Path that was read (`-` for stdin).
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// The most recent release section of a changelog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSection {
    /// Version string from the header line (`Release <version>`).
    pub version: String,
    /// Section body without header, underline, or surrounding blank lines.
    pub text: String,
    /// Change items in source order, untrimmed.
    pub items: Vec<String>,
}

/// Read a changelog document from `path`, or from stdin when `path` is `-`.
pub fn read_document(path: &Utf8Path) -> Result<String, ChangelogError> {
    let read_err = |source| ChangelogError::Read {
        path: path.to_string(),
        source,
    };

    if path.as_str() == "-" {
        debug!("reading changelog from stdin");
        return std::io::read_to_string(std::io::stdin()).map_err(read_err);
    }

    debug!(%path, "reading changelog");
    std::fs::read_to_string(path).map_err(read_err)
}

/// Extract the most recent release section from a changelog document.
///
/// # Errors
///
/// Returns [`ChangelogError::MalformedDocument`] when the document contains
/// no release header.
pub fn extract_latest_release(document: &str) -> Result<ReleaseSection, ChangelogError> {
    let lines: Vec<&str> = document.lines().collect();

    let header = (0..lines.len())
        .find(|&i| is_release_header(&lines, i))
        .ok_or(ChangelogError::MalformedDocument)?;
    let version = header_version(lines[header]).unwrap_or_default().to_string();

    let body_start = header + 2;
    let body_end = (body_start..lines.len())
        .find(|&i| is_section_boundary(&lines, i))
        .unwrap_or(lines.len());

    let mut body = &lines[body_start..body_end];
    while let [first, rest @ ..] = body
        && first.trim().is_empty()
    {
        body = rest;
    }
    while let [rest @ .., last] = body
        && last.trim().is_empty()
    {
        body = rest;
    }

    let text = body.join("\n");
    let items = split_items(&text);
    debug!(%version, items = items.len(), "extracted latest release");

    Ok(ReleaseSection {
        version,
        text,
        items,
    })
}

/// Split release section text into change items.
///
/// Items are returned exactly as they appear between markers, including any
/// trailing newline; trimming is left to the normalizer.
pub fn split_items(section: &str) -> Vec<String> {
    ITEM_MARKER_RE
        .split(section)
        .skip_while(|item| item.is_empty())
        .map(str::to_string)
        .collect()
}

/// A release header is a `Release` line followed by a dash-only underline.
fn is_release_header(lines: &[&str], index: usize) -> bool {
    header_version(lines[index]).is_some()
        && lines.get(index + 1).is_some_and(|next| is_underline(next))
}

/// Version text of a `Release [<version>]` line; empty for a bare `Release`.
///
/// The keyword must stand alone, so `Released` or `Releases` do not qualify.
fn header_version(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(RELEASE_KEYWORD)?;
    (rest.is_empty() || rest.starts_with(char::is_whitespace)).then_some(rest.trim())
}

fn is_section_boundary(lines: &[&str], index: usize) -> bool {
    is_release_header(lines, index) || lines[index].starts_with(OLDER_RELEASES_PREFIX)
}

fn is_underline(line: &str) -> bool {
    let line = line.trim_end();
    !line.is_empty() && line.chars().all(|c| c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
Release 5.0.30
--------------

 * Fixed a crash on startup. Closes GH-1800.
 * The watchdog now restarts the core
   when it stops responding.
 * Improved bug #12 handling.


Release 5.0.29
--------------

 * Older fix.

Older releases
--------------

 * Ancient history.
";

    #[test]
    fn extracts_only_the_first_section() {
        let section = extract_latest_release(CHANGELOG).unwrap();
        assert_eq!(section.version, "5.0.30");
        assert!(section.text.starts_with(" * Fixed a crash"));
        assert!(section.text.ends_with("Improved bug #12 handling."));
        assert!(!section.text.contains("Older fix"));
        assert!(!section.text.contains("Release"));
    }

    #[test]
    fn stops_at_older_releases_header() {
        let doc = "Release 1.0.0\n-------------\n\n * Only item.\n\nOlder releases\n--------------\n\n * Old.\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.text, " * Only item.");
        assert_eq!(section.items, vec!["Only item.".to_string()]);
    }

    #[test]
    fn runs_to_end_of_document_without_boundary() {
        let doc = "Release 2.0.0\n-------------\n\n * Last item.\n\n\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.text, " * Last item.");
    }

    #[test]
    fn skips_preamble_before_first_header() {
        let doc = "Changelog for the project.\n\nRelease 3.1.0\n-------------\n\n * Item.\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.version, "3.1.0");
        assert_eq!(section.text, " * Item.");
    }

    #[test]
    fn header_without_underline_is_not_a_release() {
        let doc = "Release notes are below.\n\nRelease 1.0.0\n-------------\n\n * Item.\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.version, "1.0.0");
    }

    #[test]
    fn bare_release_keyword_is_a_header() {
        let section = extract_latest_release("Release\n-------\n\n * x\n").unwrap();
        assert_eq!(section.version, "");
        assert_eq!(section.items, ["x"]);
    }

    #[test]
    fn release_keyword_must_stand_alone() {
        let doc = "Released today\n--------------\n\nRelease\t2.0\n-----------\n\n * y\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.version, "2.0");
        assert_eq!(section.items, ["y"]);
    }

    #[test]
    fn missing_header_is_malformed() {
        let result = extract_latest_release("Just some text.\n * Not a release.\n");
        assert!(matches!(result, Err(ChangelogError::MalformedDocument)));
        assert!(
            extract_latest_release("")
                .unwrap_err()
                .to_string()
                .contains("no release header")
        );
    }

    #[test]
    fn empty_release_has_no_items() {
        let doc = "Release 1.0.1\n-------------\n\nRelease 1.0.0\n-------------\n\n * Item.\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.version, "1.0.1");
        assert!(section.text.is_empty());
        assert!(section.items.is_empty());
    }

    #[test]
    fn handles_crlf_line_endings() {
        let doc = "Release 1.0.0\r\n-------------\r\n\r\n * One.\r\n * Two.\r\n";
        let section = extract_latest_release(doc).unwrap();
        assert_eq!(section.items, vec!["One.\n".to_string(), "Two.".to_string()]);
    }

    #[test]
    fn split_keeps_continuation_lines_with_their_item() {
        let section = extract_latest_release(CHANGELOG).unwrap();
        assert_eq!(section.items.len(), 3);
        assert_eq!(
            section.items[1],
            "The watchdog now restarts the core\n   when it stops responding.\n"
        );
    }

    #[test]
    fn split_drops_leading_empty_item() {
        let items = split_items(" * First.\n * Second.");
        assert_eq!(items, vec!["First.\n".to_string(), "Second.".to_string()]);
    }

    #[test]
    fn split_keeps_leading_text_without_marker() {
        let items = split_items("Highlights:\n * First.");
        assert_eq!(items, vec!["Highlights:\n".to_string(), "First.".to_string()]);
    }

    #[test]
    fn split_ignores_markers_mid_line() {
        let items = split_items(" * Use a * b here.");
        assert_eq!(items, vec!["Use a * b here.".to_string()]);
    }

    #[test]
    fn split_rejoined_reconstructs_section() {
        let section = extract_latest_release(CHANGELOG).unwrap();
        let rebuilt = format!("{ITEM_MARKER}{}", section.items.join(ITEM_MARKER));
        assert_eq!(rebuilt, section.text);
    }

    #[test]
    fn read_document_reports_missing_file() {
        let err = read_document(Utf8Path::new("/nonexistent/CHANGELOG")).unwrap_err();
        assert!(matches!(err, ChangelogError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/CHANGELOG"));
    }

    #[test]
    fn read_document_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("CHANGELOG");
        std::fs::write(&path, CHANGELOG).unwrap();
        let path = camino::Utf8PathBuf::try_from(path).unwrap();
        assert_eq!(read_document(&path).unwrap(), CHANGELOG);
    }
}
