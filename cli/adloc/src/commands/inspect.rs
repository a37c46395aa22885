//! `adloc check|find|tree|export` — offline inspection of a data file.

use std::path::Path;

use adloc_core::{format_tree, to_text, PlatformTree};
use anyhow::{Context, Result};

use crate::config::AdlocConfig;

/// Load `file` into a fresh tree built from `config`.
fn load(config: &AdlocConfig, file: &Path) -> Result<PlatformTree> {
    let mut tree = config.empty_tree()?;
    tree.load_file(file)
        .with_context(|| format!("loading {}", file.display()))?;
    Ok(tree)
}

/// Validate a data file and print a summary.
pub fn check(config: &AdlocConfig, file: &Path) -> Result<()> {
    let tree = load(config, file)?;
    let nodes = tree.descendants(tree.root())?.len() - 1;
    println!(
        "{}: ok, {} platforms across {} locations",
        file.display(),
        tree.platform_count(),
        nodes
    );
    Ok(())
}

/// Print the platforms covering `location`, one per line.
pub fn find(config: &AdlocConfig, file: &Path, location: &str) -> Result<()> {
    let tree = load(config, file)?;
    let names = find_names(&tree, location)?;
    if names.is_empty() {
        println!("no platforms cover '{location}'");
    } else {
        for name in names {
            println!("{name}");
        }
    }
    Ok(())
}

fn find_names<'a>(tree: &'a PlatformTree, location: &str) -> Result<Vec<&'a str>> {
    tree.find_names(location)
        .with_context(|| format!("searching '{location}'"))
}

/// Print the hierarchy as an ASCII tree.
pub fn tree(config: &AdlocConfig, file: &Path) -> Result<()> {
    let tree = load(config, file)?;
    print!("{}", format_tree(&tree)?);
    Ok(())
}

/// Print the hierarchy in normalised upload format.
pub fn export(config: &AdlocConfig, file: &Path) -> Result<()> {
    let tree = load(config, file)?;
    println!("{}", to_text(&tree)?);
    Ok(())
}
