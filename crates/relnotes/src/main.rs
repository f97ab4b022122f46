//! relnotes CLI
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use relnotes::{Cli, Commands, commands};
use relnotes_core::config::{Config, ConfigLoader};
use tracing::debug;

mod observability;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.color.apply();

    if let Some(dir) = &cli.chdir {
        std::env::set_current_dir(dir)
            .with_context(|| format!("failed to change directory to {}", dir.display()))?;
    }
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let cwd = utf8(cwd, "current directory")?;

    let config = load_config(&cli, &cwd)?;
    let _logs = observability::init(
        observability::filter(cli.quiet, cli.verbose, config.log_level.as_str()),
        config.log_dir.as_deref().map(Utf8Path::as_std_path),
    );
    debug!(cwd = %cwd, json = cli.json, verbose = cli.verbose, "starting");

    let result = match cli.command {
        Commands::Notes(args) => commands::notes::cmd_notes(args, cli.json, &config, &cwd),
        Commands::Info(args) => commands::info::cmd_info(args, cli.json, &config, &cwd),
    };
    if let Err(err) = &result {
        tracing::error!(error = format!("{err:#}"), "command failed");
    }
    result
}

/// Discovered project config, layered under an explicit `--config` file.
fn load_config(cli: &Cli, cwd: &Utf8Path) -> Result<Config> {
    let mut loader = ConfigLoader::new().with_project_search(cwd);
    if let Some(path) = &cli.config {
        loader = loader.with_file(&utf8(path.clone(), "config path")?);
    }
    loader.load().context("failed to load configuration")
}

fn utf8(path: PathBuf, what: &str) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("{what} is not valid UTF-8: {}", path.display()))
}
