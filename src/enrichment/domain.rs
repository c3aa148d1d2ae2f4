//! Internal domain models for catalog lookups.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use crate::cache::CacheError;

/// A MusicBrainz release, reduced to what identification and cover lookup need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Release {
    /// MusicBrainz release ID
    pub id: String,
    pub title: String,
    /// Release country code (XE, XW, GB, ...)
    pub country: Option<String>,
    /// Physical media, one per disc
    pub media: Vec<Medium>,
    /// Number of images the Cover Art Archive holds for this release
    pub cover_art_count: u32,
    /// Release group this release belongs to
    pub release_group_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Medium {
    /// Media format (CD, Vinyl, Digital Media, ...)
    pub format: Option<String>,
}

/// A MusicBrainz release group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseGroup {
    pub id: String,
    /// Genre names as reported, unsorted
    pub genres: Vec<String>,
    /// URL relationships
    pub relations: Vec<Relation>,
}

impl ReleaseGroup {
    /// URL of the first relation of the given type.
    pub fn url_for(&self, kind: &str) -> Option<&str> {
        self.relations
            .iter()
            .find(|rel| rel.kind == kind)
            .map(|rel| rel.url.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relation {
    /// Relationship type (wikidata, discogs, ...)
    pub kind: String,
    pub url: String,
}

/// One image listed by the Cover Art Archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    /// Full-size image URL
    pub url: String,
    /// Whether this is the front cover
    pub front: bool,
}

/// Lyrics for one track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lyrics {
    pub instrumental: bool,
    pub plain: Option<String>,
    /// LRC-formatted synchronized lyrics
    pub synced: Option<String>,
}

/// Errors that can occur during enrichment
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichmentError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    Http { status: u16, url: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The catalog has no entry for the query
    #[error("No matches found")]
    NoMatches,

    #[error("Request cancelled")]
    Cancelled,

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("API contract violation: expected {expected}, got {actual}")]
    ContractViolation { expected: String, actual: String },
}

impl From<CacheError> for EnrichmentError {
    fn from(err: CacheError) -> Self {
        match err {
            CacheError::Cancelled => EnrichmentError::Cancelled,
            CacheError::InvalidUrl(url) => {
                EnrichmentError::InvalidResponse(format!("invalid URL {url}"))
            }
            CacheError::Transport(msg) => EnrichmentError::Network(msg),
        }
    }
}
