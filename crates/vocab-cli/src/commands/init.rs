//! The `vocab init` command.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use vocab_core::config::{CONFIG_FILE, SAMPLE_CONFIG};

pub fn execute(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<()> {
    let target = config_path.unwrap_or(Path::new(CONFIG_FILE));
    if target.exists() {
        println!("{} already exists, skipping.", target.display());
    } else {
        std::fs::write(target, SAMPLE_CONFIG)
            .with_context(|| format!("failed to write {}", target.display()))?;
        println!("Created {}", target.display());
    }

    let mut ctx = super::open(Some(target), data_dir)?;
    let added = ctx.state.seed_samples()?;
    if added > 0 {
        println!(
            "Loaded {added} sample word(s) into {}",
            ctx.config.data_dir.display()
        );
    } else {
        println!(
            "{} already has {} word(s), no samples loaded.",
            ctx.config.data_dir.display(),
            ctx.state.words().len()
        );
    }

    println!("\nNext steps:");
    println!("  1. Add words: vocab add <FOREIGN> <TRANSLATION>");
    println!("  2. Review them: vocab list");
    println!("  3. Take a test: vocab quiz");

    Ok(())
}
