use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Command};
use clap_mangen::Man;

const DEFAULT_DIR: &str = "dist/share/man/man1";

#[derive(Args, Debug)]
pub struct ManArgs {
    /// Directory for the pages, relative to the workspace root
    #[arg(long = "out-dir", default_value = DEFAULT_DIR)]
    pub out_dir: PathBuf,
}

impl Default for ManArgs {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_DIR),
        }
    }
}

pub fn run(args: &ManArgs) -> Result<()> {
    let out_dir = crate::output_dir(&args.out_dir)?;

    for (name, page) in pages(relnotes::command())? {
        let path = out_dir.join(format!("{name}.1"));
        fs::write(&path, page).with_context(|| format!("cannot write {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

/// Rendered roff for the root command, then `relnotes-<sub>` per subcommand.
fn pages(root: Command) -> Result<Vec<(String, Vec<u8>)>> {
    let root_name = root.get_name().to_string();
    let mut pages = vec![(root_name.clone(), render(root.clone(), &root_name)?)];

    for sub in root.get_subcommands() {
        let name = format!("{root_name}-{}", sub.get_name());
        let page = render(sub.clone(), &name)?;
        pages.push((name, page));
    }
    Ok(pages)
}

fn render(cmd: Command, name: &str) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    Man::new(cmd)
        .title(name)
        .render(&mut buf)
        .with_context(|| format!("cannot render man page for {name}"))?;
    Ok(buf)
}
