//! MusicBrainz API integration
//!
//! Resolves releases from disc IDs, looks up releases for cover art
//! availability, and release groups for genres and URL relations.
//!
//! API docs: https://musicbrainz.org/doc/MusicBrainz_API

pub mod dto;
mod adapter;
mod client;

pub use client::MusicBrainzClient;
