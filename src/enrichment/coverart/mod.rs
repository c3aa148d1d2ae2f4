//! Cover Art Archive integration
//!
//! Lists artwork for MusicBrainz releases and downloads the images.
//! No API key required.

pub mod dto;
mod client;

pub use client::CoverArtClient;
