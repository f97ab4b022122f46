use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use clap_complete::{Shell, generate_to};

const DEFAULT_DIR: &str = "dist/share/completions";

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Directory for the scripts, relative to the workspace root
    #[arg(long = "out-dir", default_value = DEFAULT_DIR)]
    pub out_dir: PathBuf,

    /// Only this shell (default: bash, zsh, fish, powershell)
    #[arg(long, value_enum)]
    pub shell: Option<Shell>,
}

impl Default for CompletionsArgs {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_DIR),
            shell: None,
        }
    }
}

impl CompletionsArgs {
    fn shells(&self) -> Vec<Shell> {
        self.shell.map_or_else(
            || vec![Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell],
            |shell| vec![shell],
        )
    }
}

pub fn run(args: &CompletionsArgs) -> Result<()> {
    let out_dir = crate::output_dir(&args.out_dir)?;
    let mut cli = relnotes::command();

    for shell in args.shells() {
        let path = generate_to(shell, &mut cli, "relnotes", &out_dir)
            .with_context(|| format!("cannot write {shell} completions"))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
