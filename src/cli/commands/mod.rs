//! CLI command definitions and dispatch.
//!
//! - `scan`: audit and enrich every album under a directory
//! - `config`: print the loaded configuration

mod config;
mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use config::cmd_config;
pub use scan::{ScanArgs, cmd_scan};

/// Audit FLAC albums and fill in missing tags from online catalogs
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true, env = "FLAC_AUDIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes over when unset
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Check every album under a directory
    Scan(ScanArgs),
    /// Print the loaded configuration as TOML
    Config,
}

/// Run the specified CLI command.
///
/// Returns `Ok(false)` when the command ran but found problems.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Scan(args) => {
            let rt = Runtime::new()?;
            cmd_scan(&rt, args, cli.config.as_deref())
        }
        Commands::Config => {
            cmd_config(cli.config.as_deref())?;
            Ok(true)
        }
    }
}
