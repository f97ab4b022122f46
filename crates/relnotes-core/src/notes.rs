//! Release notes orchestration.
//!
//! Resolves where the changelog lives, which format to render, and which
//! issue tracker to link against (options > config > built-in defaults),
//! then runs the pipeline:
//!
//! 1. Extract the latest release section ([`changelog::extract_latest_release`])
//! 2. Render it ([`render::render_section`])
//!
//! The extracted section is computed once and handed to whichever renderer
//! was selected.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;
use tracing::{debug, debug_span};

use crate::autolink::{InvalidIssueUrl, IssueTracker};
use crate::changelog::{self, ChangelogError};
use crate::config::Config;
use crate::render::{self, OutputFormat, RenderedOutput};

/// Changelog file name used when neither options nor config name one.
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG";

/// Errors from the release notes pipeline.
#[derive(Error, Debug)]
pub enum NotesError {
    /// The changelog could not be read or has no release header.
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// The configured or overridden issue tracker URL is unusable.
    #[error(transparent)]
    IssueUrl(#[from] InvalidIssueUrl),
}

/// Options for the [`preview_notes`] orchestrator.
#[derive(Debug, Clone, Default)]
pub struct PreviewNotesOptions {
    /// Changelog path (default: config, then `CHANGELOG`). `-` reads stdin.
    pub changelog: Option<Utf8PathBuf>,
    /// Output format (default: config, then HTML).
    pub format: Option<OutputFormat>,
    /// Issue tracker base URL (default: config, then the built-in tracker).
    pub issue_url: Option<String>,
}

/// Render the latest release of an in-memory changelog document.
///
/// # Errors
///
/// Returns [`ChangelogError::MalformedDocument`] if the document has no
/// release header.
pub fn render_notes(
    document: &str,
    format: OutputFormat,
    tracker: &IssueTracker,
) -> Result<RenderedOutput, ChangelogError> {
    let section = changelog::extract_latest_release(document)?;
    Ok(render::render_section(&section, format, tracker))
}

/// Read the configured changelog and render its latest release.
///
/// # Errors
///
/// Returns [`NotesError::IssueUrl`] before touching the changelog if the
/// tracker URL is rejected, and [`NotesError::Changelog`] if the changelog
/// cannot be read or parsed.
pub fn preview_notes(
    project_root: &Utf8Path,
    config: &Config,
    options: PreviewNotesOptions,
) -> Result<RenderedOutput, NotesError> {
    let path = resolve_changelog_path(project_root, config, options.changelog.as_deref());
    let format = resolve_format(config, options.format);
    let tracker = resolve_tracker(config, options.issue_url.as_deref())?;
    let span = debug_span!("preview_notes", %path, %format, issue_url = tracker.base_url());
    let _entered = span.enter();
    debug!("resolved notes options");

    let document = changelog::read_document(&path)?;
    Ok(render_notes(&document, format, &tracker)?)
}

/// Resolve the changelog path: override > config > [`DEFAULT_CHANGELOG`].
///
/// Relative paths are resolved against `project_root`; `-` is kept as is.
pub fn resolve_changelog_path(
    project_root: &Utf8Path,
    config: &Config,
    path_override: Option<&Utf8Path>,
) -> Utf8PathBuf {
    let path = path_override
        .or_else(|| {
            config
                .changelog
                .as_ref()
                .and_then(|c| c.path.as_deref())
        })
        .unwrap_or_else(|| Utf8Path::new(DEFAULT_CHANGELOG));

    if path.as_str() == "-" || path.is_absolute() {
        path.to_path_buf()
    } else {
        project_root.join(path)
    }
}

/// Resolve the output format: override > config > HTML.
pub fn resolve_format(config: &Config, format_override: Option<OutputFormat>) -> OutputFormat {
    format_override
        .or_else(|| config.changelog.as_ref().and_then(|c| c.format))
        .unwrap_or_default()
}

/// Resolve the issue tracker: override > config > built-in default.
///
/// # Errors
///
/// Returns [`InvalidIssueUrl`] if the chosen URL is rejected by
/// [`IssueTracker::new`].
pub fn resolve_tracker(
    config: &Config,
    url_override: Option<&str>,
) -> Result<IssueTracker, InvalidIssueUrl> {
    url_override
        .or_else(|| {
            config
                .changelog
                .as_ref()
                .and_then(|c| c.issue_url.as_deref())
        })
        .map_or_else(|| Ok(IssueTracker::default()), IssueTracker::new)
}
