//! Trait definitions for external catalog clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! Every method takes the run's cancellation token so a shutdown reaches
//! in-flight lookups and rate-limiter waits.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::coverart::CoverArtClient;
use super::domain::{CoverImage, EnrichmentError, Lyrics, Release, ReleaseGroup};
use super::lrclib::LrclibClient;
use super::musicbrainz::MusicBrainzClient;
use super::wikipedia::WikipediaClient;

/// Release metadata lookups.
#[async_trait]
pub trait MusicBrainzApi: Send + Sync {
    /// Releases containing a disc with this disc ID; empty when unknown.
    async fn releases_by_disc_id(
        &self,
        disc_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Release>, EnrichmentError>;

    /// Look up a release by its MusicBrainz ID.
    async fn release(
        &self,
        release_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Release, EnrichmentError>;

    /// Look up a release group by its MusicBrainz ID.
    async fn release_group(
        &self,
        release_group_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ReleaseGroup, EnrichmentError>;
}

/// Cover art listing and image download.
#[async_trait]
pub trait CoverArtApi: Send + Sync {
    /// Images available for a release.
    async fn list_images(
        &self,
        release_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverImage>, EnrichmentError>;

    /// Raw bytes of an image.
    async fn fetch_image(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, EnrichmentError>;
}

/// Lyrics lookup.
#[async_trait]
pub trait LyricsApi: Send + Sync {
    /// Lyrics for a track. [`EnrichmentError::NoMatches`] when there are none.
    async fn find_lyrics(
        &self,
        track: &str,
        artist: &str,
        album: &str,
        cancel: &CancellationToken,
    ) -> Result<Lyrics, EnrichmentError>;
}

/// Encyclopedia cross-reference for album covers.
#[async_trait]
pub trait EncyclopediaApi: Send + Sync {
    /// Album cover URL for a release group, if the encyclopedia has one.
    async fn album_cover_url(
        &self,
        release_group: &ReleaseGroup,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichmentError>;
}

// Implement traits for real clients

#[async_trait]
impl MusicBrainzApi for MusicBrainzClient {
    async fn releases_by_disc_id(
        &self,
        disc_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Release>, EnrichmentError> {
        self.releases_by_disc_id(disc_id, cancel).await
    }

    async fn release(
        &self,
        release_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Release, EnrichmentError> {
        self.release(release_id, cancel).await
    }

    async fn release_group(
        &self,
        release_group_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ReleaseGroup, EnrichmentError> {
        self.release_group(release_group_id, cancel).await
    }
}

#[async_trait]
impl CoverArtApi for CoverArtClient {
    async fn list_images(
        &self,
        release_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverImage>, EnrichmentError> {
        self.list_images(release_id, cancel).await
    }

    async fn fetch_image(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, EnrichmentError> {
        self.fetch_image(url, cancel).await
    }
}

#[async_trait]
impl LyricsApi for LrclibClient {
    async fn find_lyrics(
        &self,
        track: &str,
        artist: &str,
        album: &str,
        cancel: &CancellationToken,
    ) -> Result<Lyrics, EnrichmentError> {
        self.find_lyrics(track, artist, album, cancel).await
    }
}

#[async_trait]
impl EncyclopediaApi for WikipediaClient {
    async fn album_cover_url(
        &self,
        release_group: &ReleaseGroup,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichmentError> {
        self.album_cover_url(release_group, cancel).await
    }
}
