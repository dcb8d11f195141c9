use anyhow::{bail, Result};
use tracescope_runtime::Config;

use crate::context::ExecutionContext;

pub fn init(ctx: &ExecutionContext, force: bool) -> Result<()> {
    let path = ctx.config_path();
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

pub fn show(ctx: &ExecutionContext) -> Result<()> {
    let config = ctx.config()?;
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
