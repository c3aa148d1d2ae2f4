//! Command-line interface for flac-audit.
//!
//! Thin layer over the library: parses flags, layers them over the loaded
//! configuration, and reports the scan result.

mod commands;

pub use commands::{Cli, Commands, ScanArgs, run_command};
