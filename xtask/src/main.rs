//! Release packaging tasks for relnotes.
//!
//! - `completions`: shell completion scripts
//! - `man`: man pages for `relnotes` and each subcommand
//! - `dist`: both, into the default `dist/share` layout
//!
//! Output paths are relative to the workspace root.

#![deny(unsafe_code)]

mod commands;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::completions::CompletionsArgs;
use commands::man::ManArgs;

#[derive(Parser, Debug)]
#[command(name = "xtask", about = "relnotes packaging tasks")]
struct Xtask {
    #[command(subcommand)]
    task: Task,
}

#[derive(Subcommand, Debug)]
enum Task {
    /// Write shell completion scripts for `relnotes`.
    Completions(CompletionsArgs),

    /// Write man pages for `relnotes` and its subcommands.
    Man(ManArgs),

    /// Write completions and man pages under `dist/share`.
    Dist,
}

fn main() -> Result<()> {
    match Xtask::parse().task {
        Task::Completions(args) => commands::completions::run(&args),
        Task::Man(args) => commands::man::run(&args),
        Task::Dist => {
            commands::completions::run(&CompletionsArgs::default())?;
            commands::man::run(&ManArgs::default())
        }
    }
}

/// Create `relative` under the workspace root and return its full path.
fn output_dir(relative: &Path) -> Result<PathBuf> {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let dir = manifest_dir.parent().unwrap_or(manifest_dir).join(relative);
    fs::create_dir_all(&dir).with_context(|| format!("cannot create {}", dir.display()))?;
    Ok(dir)
}
