//! Config command implementation

use anyhow::Result;
use colored::Colorize;

use timeglass_dashboard::config::{validate_config, Config};

/// Print the effective configuration as TOML
pub fn show(cfg: &Config) -> Result<()> {
    println!("{}", "Effective configuration".bold().underline());
    println!();
    println!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}

/// Validate the configuration and report the result
pub fn validate(cfg: &Config) -> Result<()> {
    validate_config(cfg)?;
    println!("{} Configuration is valid", "✓".green());
    println!("  API:       {}", cfg.api.base_url);
    println!("  Page size: {}", cfg.dashboard.page_size);
    Ok(())
}
