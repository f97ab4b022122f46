//! Notes command: thin CLI layer over `relnotes_core::notes::preview_notes`.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use tracing::{Span, debug, info, instrument};

use relnotes_core::OutputFormat;
use relnotes_core::config::Config;
use relnotes_core::notes::{self, PreviewNotesOptions};

/// Arguments for the `notes` subcommand.
#[derive(Args, Debug, Default)]
pub struct NotesArgs {
    /// Changelog to read (default: config, then ./CHANGELOG; `-` for stdin)
    #[arg(value_name = "CHANGELOG")]
    pub changelog: Option<Utf8PathBuf>,

    /// Output format (default: config, then html)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Issue tracker base URL that issue numbers are appended to
    #[arg(long, value_name = "URL")]
    pub issue_url: Option<String>,
}

/// Execute the notes command.
#[instrument(name = "cmd_notes", skip_all, fields(version = tracing::field::Empty))]
pub fn cmd_notes(
    args: NotesArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!("rendering latest release notes");

    let options = PreviewNotesOptions {
        changelog: args.changelog,
        format: args.format,
        issue_url: args.issue_url,
    };

    let result =
        notes::preview_notes(cwd, config, options).context("failed to render release notes")?;
    Span::current().record("version", result.version.as_str());
    info!(format = %result.format, "rendered release notes");

    if global_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.notes);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_changelog(dir: &TempDir) -> Utf8PathBuf {
        let path = dir.path().join("CHANGELOG");
        fs::write(&path, "Release 1.0.0\n-------------\n\n * Fixed GH-1.\n").unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn test_cmd_notes_renders_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let args = NotesArgs {
            changelog: Some(write_changelog(&tmp)),
            format: Some(OutputFormat::Markdown),
            issue_url: None,
        };
        let cwd = camino::Utf8PathBuf::from("/tmp");
        assert!(cmd_notes(args, false, &Config::default(), &cwd).is_ok());
    }

    #[test]
    fn test_cmd_notes_json_via_global() {
        let tmp = TempDir::new().unwrap();
        let args = NotesArgs {
            changelog: Some(write_changelog(&tmp)),
            ..NotesArgs::default()
        };
        let cwd = camino::Utf8PathBuf::from("/tmp");
        assert!(cmd_notes(args, true, &Config::default(), &cwd).is_ok());
    }

    #[test]
    fn test_cmd_notes_missing_changelog_fails() {
        let tmp = TempDir::new().unwrap();
        let cwd = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let err = cmd_notes(NotesArgs::default(), false, &Config::default(), &cwd).unwrap_err();
        assert!(err.to_string().contains("failed to render release notes"));
    }
}
