//! LRCLIB integration
//!
//! Free lyrics database with synchronized (LRC) and plain lyrics.
//!
//! API docs: https://lrclib.net/docs

pub mod dto;
mod client;

pub use client::LrclibClient;
