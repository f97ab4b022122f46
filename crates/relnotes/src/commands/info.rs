//! Info command: show package, config, and resolved changelog information.

use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use relnotes_core::autolink;
use relnotes_core::changelog;
use relnotes_core::config::{self, Config};
use relnotes_core::notes;

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_config_dir: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
}

impl ConfigInfo {
    fn from_config(config: &Config, cwd: &camino::Utf8Path) -> Self {
        Self {
            config_file: config::find_project_config(cwd).map(|p| p.to_string()),
            user_config_dir: config::user_config_dir().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
        }
    }
}

/// Resolved changelog settings, plus the latest release if it can be read.
#[derive(Serialize)]
struct ChangelogInfo {
    path: String,
    exists: bool,
    format: String,
    issue_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    issue_url_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_item_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latest_reference_count: Option<usize>,
}

impl ChangelogInfo {
    fn resolve(config: &Config, cwd: &camino::Utf8Path) -> Self {
        let path = notes::resolve_changelog_path(cwd, config, None);
        let exists = path.is_file();
        let latest = exists
            .then(|| changelog::read_document(&path).ok())
            .flatten()
            .and_then(|doc| changelog::extract_latest_release(&doc).ok());
        let tracker = notes::resolve_tracker(config, None);

        Self {
            exists,
            format: notes::resolve_format(config, None).to_string(),
            issue_url: tracker
                .as_ref()
                .map_or_else(|e| e.url.clone(), |t| t.base_url().to_string()),
            issue_url_error: tracker.err().map(|e| e.to_string()),
            latest_item_count: latest.as_ref().map(|s| s.items.len()),
            latest_reference_count: latest
                .as_ref()
                .map(|s| autolink::find_references(&s.text).len()),
            latest_release: latest.map(|s| s.version),
            path: path.to_string(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    changelog: ChangelogInfo,
}

/// Print package information.
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `cwd` - Current working directory for config and changelog discovery
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    cwd: &camino::Utf8Path,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, cwd),
        changelog: ChangelogInfo::resolve(config, cwd),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    println!();
    println!("{}", "Configuration".bold().underline());
    if let Some(ref path) = full_info.config.config_file {
        println!("{}: {}", "Config file".dimmed(), path.cyan());
    } else {
        println!("{}: {}", "Config file".dimmed(), "none loaded".yellow());
    }
    if let Some(ref dir) = full_info.config.user_config_dir {
        println!("{}: {}", "User config dir".dimmed(), dir);
    }
    println!("{}: {}", "Log level".dimmed(), full_info.config.log_level);
    if let Some(ref dir) = full_info.config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }

    let changelog = &full_info.changelog;
    println!();
    println!("{}", "Changelog".bold().underline());
    if changelog.exists {
        println!("{}: {}", "Path".dimmed(), changelog.path.cyan());
    } else {
        println!(
            "{}: {} {}",
            "Path".dimmed(),
            changelog.path.yellow(),
            "(not found)".yellow()
        );
    }
    println!("{}: {}", "Format".dimmed(), changelog.format.cyan());
    if let Some(ref err) = changelog.issue_url_error {
        println!("{}: {}", "Issue URL".dimmed(), err.red());
    } else {
        println!("{}: {}", "Issue URL".dimmed(), changelog.issue_url.cyan());
    }
    match (&changelog.latest_release, changelog.latest_item_count) {
        (Some(version), Some(count)) => println!(
            "{}: {} ({count} item(s), {} issue reference(s))",
            "Latest release".dimmed(),
            version.green(),
            changelog.latest_reference_count.unwrap_or_default()
        ),
        _ if changelog.exists => println!(
            "  {} {}",
            "○".yellow(),
            "No release header found".yellow()
        ),
        _ => {}
    }

    Ok(())
}
