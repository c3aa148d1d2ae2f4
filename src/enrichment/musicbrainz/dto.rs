//! MusicBrainz API Data Transfer Objects
//!
//! These types match EXACTLY what the MusicBrainz API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the musicbrainz module - convert to domain types.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! Endpoints used:
//! - `/discid/{id}` - releases containing a disc with this ID
//! - `/release/{id}?inc=release-groups` - release details
//! - `/release-group/{id}?inc=url-rels+genres` - URL relations and genres

use serde::{Deserialize, Serialize};

/// Disc ID lookup response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscIdResponse {
    /// Releases containing a medium with this disc ID
    #[serde(default)]
    pub releases: Vec<Release>,
}

/// Release (album/single/EP)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Release {
    /// MusicBrainz release ID
    pub id: String,
    /// Release title
    pub title: String,
    /// Release status (Official, Bootleg, etc.)
    pub status: Option<String>,
    /// Release date (YYYY, YYYY-MM, or YYYY-MM-DD)
    pub date: Option<String>,
    /// Country code
    pub country: Option<String>,
    /// Cover Art Archive summary
    pub cover_art_archive: Option<CoverArtArchive>,
    /// Release group (only with inc=release-groups)
    pub release_group: Option<ReleaseGroupRef>,
    /// Media (discs) in this release
    #[serde(default)]
    pub media: Vec<Medium>,
}

/// Cover Art Archive summary embedded in a release
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoverArtArchive {
    /// Number of images available
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub artwork: bool,
    #[serde(default)]
    pub front: bool,
    #[serde(default)]
    pub back: bool,
}

/// Release group as embedded in a release
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseGroupRef {
    /// MusicBrainz release group ID
    pub id: String,
    pub title: Option<String>,
    /// Primary type (Album, Single, EP, etc.)
    pub primary_type: Option<String>,
}

/// Medium (disc) within a release
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Medium {
    /// Position in release (disc number)
    pub position: Option<u32>,
    /// Format (CD, Vinyl, Digital, etc.)
    pub format: Option<String>,
    /// Number of tracks
    pub track_count: Option<u32>,
}

/// Release group lookup response
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseGroup {
    pub id: String,
    pub title: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Genre with vote count
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Genre {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub count: u32,
}

/// Relationship to another entity (only URL relations are requested)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Relation {
    /// Relationship type, e.g. "wikidata"
    #[serde(rename = "type")]
    pub relation_type: String,
    pub target_type: Option<String>,
    pub url: Option<UrlTarget>,
}

/// URL end of a relationship
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UrlTarget {
    pub id: Option<String>,
    pub resource: String,
}

/// Error response from MusicBrainz API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
    pub help: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
