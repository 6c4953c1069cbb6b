//! `vocab import` and `vocab export`.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use vocab_core::codec;

use super::Context;

pub fn import(mut ctx: Context, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let summary = ctx.state.import_words(&content)?;
    if summary.imported == 0 && summary.rejected == 0 {
        println!("No valid words found in {}", file.display());
        return Ok(());
    }

    println!("Imported {} word(s)", summary.imported);
    if summary.rejected > 0 {
        println!("Skipped {} invalid pair(s)", summary.rejected);
    }
    Ok(())
}

pub fn export(ctx: Context, output: Option<PathBuf>) -> Result<()> {
    let content = ctx.state.export_words()?;
    let path = output
        .unwrap_or_else(|| PathBuf::from(codec::export_filename(chrono::Local::now().date_naive())));

    std::fs::write(&path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "Exported {} word(s) to {}",
        ctx.state.words().len(),
        path.display()
    );
    Ok(())
}
