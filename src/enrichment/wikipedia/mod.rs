//! Wikipedia integration
//!
//! Fallback cover art source for releases the Cover Art Archive has no
//! images for. Goes through Wikidata to find the English article.

pub mod dto;
mod client;

pub use client::WikipediaClient;
