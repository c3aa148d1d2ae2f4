//! LRCLIB HTTP client
//!
//! Looks up lyrics by exact (track, artist, album) signature.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::dto;
use crate::cache::RemoteCache;
use crate::enrichment::domain::{EnrichmentError, Lyrics};
use crate::enrichment::http;

/// LRCLIB API client
pub struct LrclibClient {
    cache: Arc<RemoteCache>,
    base_url: String,
}

impl LrclibClient {
    pub fn new(cache: Arc<RemoteCache>, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            base_url: base_url.into(),
        }
    }

    /// Find lyrics for a track.
    ///
    /// Returns [`EnrichmentError::NoMatches`] when LRCLIB has no entry.
    pub async fn find_lyrics(
        &self,
        track: &str,
        artist: &str,
        album: &str,
        cancel: &CancellationToken,
    ) -> Result<Lyrics, EnrichmentError> {
        let url = format!(
            "{}/get?artist_name={}&album_name={}&track_name={}",
            http::base(&self.base_url),
            urlencoding::encode(artist),
            urlencoding::encode(album),
            urlencoding::encode(track)
        );

        let response: dto::LyricsResponse = http::get_json(&self.cache, &url, cancel).await?;
        Ok(Lyrics {
            instrumental: response.instrumental,
            plain: response.plain_lyrics.filter(|s| !s.is_empty()),
            synced: response.synced_lyrics.filter(|s| !s.is_empty()),
        })
    }
}
