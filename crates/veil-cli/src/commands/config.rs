use anyhow::{Context, Result, bail};
use colored::Colorize;
use veil_infrastructure::ConfigService;

use crate::context::AppContext;

pub fn show(ctx: &AppContext) -> Result<()> {
    println!("base_url  = {}", ctx.config.base_url);
    println!("log_level = {}", ctx.config.log_level);
    println!("file      = {}", ctx.paths.config_file().display());
    Ok(())
}

/// Writes the effective configuration to the config file.
pub fn init(ctx: &AppContext, force: bool) -> Result<()> {
    let path = ctx.paths.config_file();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    ConfigService::new(ctx.paths.clone())
        .save(&ctx.config)
        .context("Failed to write configuration")?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}
