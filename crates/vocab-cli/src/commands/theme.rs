//! The `vocab theme` command.

use anyhow::{anyhow, Result};
use vocab_core::model::Theme;

use super::Context;

pub fn execute(mut ctx: Context, value: Option<&str>) -> Result<()> {
    let theme = match value {
        None => ctx.state.theme(),
        Some("toggle") => ctx.state.toggle_theme()?,
        Some(raw) => {
            let theme: Theme = raw.parse().map_err(|e: String| anyhow!(e))?;
            ctx.state.set_theme(theme)?;
            theme
        }
    };
    println!("{theme}");
    Ok(())
}
