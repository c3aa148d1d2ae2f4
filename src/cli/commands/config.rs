//! Configuration inspection.

use std::path::Path;

use anyhow::Context;

use crate::config;

/// Print the configuration a scan would start from.
pub fn cmd_config(path: Option<&Path>) -> anyhow::Result<()> {
    let config = config::load(path)?;
    let toml = toml::to_string_pretty(&config).context("Failed to serialize configuration")?;
    match config::config_path() {
        Some(default) if path.is_none() => println!("# {}", default.display()),
        _ => {}
    }
    print!("{toml}");
    Ok(())
}
