//! flac-audit - checks FLAC albums for consistent tags and fills in what is
//! missing (release IDs, cover art, genres, lyrics) from online catalogs.
//!
//! Runs in dry-run mode unless `--write` is given: staged changes are logged
//! and nothing on disk is touched.

pub mod cache;
pub mod cli;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod library;
pub mod metadata;
pub mod model;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<ExitCode> {
    let args = cli::Cli::parse();

    let filter = match &args.log_level {
        Some(level) => EnvFilter::try_new(format!("flac_audit={level}"))?,
        None => EnvFilter::from_default_env().add_directive("flac_audit=info".parse()?),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    if cli::run_command(&args)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
