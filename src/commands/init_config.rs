use anyhow::{bail, Result};
use colored::*;
use std::path::Path;

use reelcast::config::{self, AppConfig};

pub fn execute(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config::save(path, &AppConfig::default())?;
    println!("{} {}", "Wrote".green().bold(), path.display());
    Ok(())
}
