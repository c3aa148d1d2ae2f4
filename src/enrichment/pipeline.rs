//! Per-track enrichment.
//!
//! Every track goes through the same ordered steps, each of which sees the
//! edits staged by the ones before it:
//!
//! 1. normalize URL-shaped identifiers and placeholder values
//! 2. resolve the release ID from the disc ID, when missing
//! 3. gate on the per-track tag rules
//! 4. front cover
//! 5. genres
//! 6. lyrics
//!
//! A step failure stops the track. Nothing here touches the file; the album
//! orchestrator decides whether staged edits are committed.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cache::RemoteCache;
use crate::config::{CatalogConfig, Config, ConfigError, ValidationConfig};
use crate::error::TrackError;
use crate::model::{TagName, Track};
use crate::validation::validate_track_tags;

use super::coverart::CoverArtClient;
use super::domain::{CoverImage, EnrichmentError, Release};
use super::identify::ReleaseSelector;
use super::lrclib::LrclibClient;
use super::lyrics::tidy_lyrics;
use super::musicbrainz::MusicBrainzClient;
use super::normalize::TagNormalizer;
use super::traits::{CoverArtApi, EncyclopediaApi, LyricsApi, MusicBrainzApi};
use super::wikipedia::WikipediaClient;

/// The remote catalogs enrichment consults.
#[derive(Clone)]
pub struct Catalogs {
    pub musicbrainz: Arc<dyn MusicBrainzApi>,
    pub coverart: Arc<dyn CoverArtApi>,
    pub lyrics: Arc<dyn LyricsApi>,
    pub encyclopedia: Arc<dyn EncyclopediaApi>,
}

impl Catalogs {
    /// Real clients, all sharing one response cache.
    pub fn from_config(config: &CatalogConfig, cache: Arc<RemoteCache>) -> Self {
        Self {
            musicbrainz: Arc::new(MusicBrainzClient::new(
                cache.clone(),
                &config.musicbrainz_base_url,
            )),
            coverart: Arc::new(CoverArtClient::new(cache.clone(), &config.coverart_base_url)),
            lyrics: Arc::new(LrclibClient::new(cache.clone(), &config.lrclib_base_url)),
            encyclopedia: Arc::new(WikipediaClient::new(
                cache,
                &config.wikipedia_base_url,
                &config.wikidata_base_url,
            )),
        }
    }
}

/// Runs the enrichment steps against one track at a time.
pub struct Enricher {
    catalogs: Catalogs,
    normalizer: TagNormalizer,
    selector: ReleaseSelector,
    validation: ValidationConfig,
    fetch_lyrics: bool,
    international_artists: Vec<String>,
}

impl Enricher {
    pub fn new(catalogs: Catalogs, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            catalogs,
            normalizer: TagNormalizer::from_config(&config.normalization)?,
            selector: ReleaseSelector::from_config(&config.identification),
            validation: config.validation.clone(),
            fetch_lyrics: config.scan.fetch_lyrics,
            international_artists: config.lyrics.international_artists.clone(),
        })
    }

    pub fn validation(&self) -> &ValidationConfig {
        &self.validation
    }

    /// Stage every edit the track needs.
    ///
    /// Returns [`TrackError::Validation`] when the track fails its tag rules
    /// after normalization; no catalog lookups are made for it in that case.
    pub async fn enrich_track(
        &self,
        track: &mut Track,
        cancel: &CancellationToken,
    ) -> Result<(), TrackError> {
        if cancel.is_cancelled() {
            return Err(TrackError::Cancelled);
        }

        self.normalizer.correct_tags(track);
        self.resolve_album_id(track, cancel).await?;

        let violations = validate_track_tags(track, &self.validation);
        if !violations.is_empty() {
            return Err(TrackError::Validation(violations));
        }

        if !track.has_picture() {
            self.add_front_cover(track, cancel).await?;
        }
        if !track.has_genre() {
            self.add_genres(track, cancel).await?;
        }
        if self.fetch_lyrics && !track.has_lyrics() {
            self.add_lyrics(track, cancel).await?;
        }

        Ok(())
    }

    async fn resolve_album_id(
        &self,
        track: &mut Track,
        cancel: &CancellationToken,
    ) -> Result<(), EnrichmentError> {
        if track.tag_ok(TagName::MusicBrainzAlbumId).is_some() {
            return Ok(());
        }
        let Some(disc_id) = track.single_tag(TagName::MusicBrainzDiscId).map(str::to_string)
        else {
            return Ok(());
        };

        let releases = self
            .catalogs
            .musicbrainz
            .releases_by_disc_id(&disc_id, cancel)
            .await?;
        match self.selector.select(&releases) {
            Some(release) => {
                tracing::debug!(disc_id = %disc_id, release = %release.id, "Resolved release from disc ID");
                track.set_musicbrainz_album_id(release.id.clone());
            }
            None => {
                tracing::info!(disc_id = %disc_id, candidates = releases.len(), "Unable to populate musicbrainz album ID");
            }
        }
        Ok(())
    }

    async fn add_front_cover(
        &self,
        track: &mut Track,
        cancel: &CancellationToken,
    ) -> Result<(), TrackError> {
        let Some(album_id) = first_album_id(track) else {
            return Ok(());
        };

        let release = self.catalogs.musicbrainz.release(&album_id, cancel).await?;
        let mut url = None;
        if release.cover_art_count > 0 {
            let images = self
                .catalogs
                .coverart
                .list_images(&release.id, cancel)
                .await?;
            url = pick_cover(&images);
        }
        if url.is_none() {
            url = self.encyclopedia_cover(&release, cancel).await?;
        }
        let Some(url) = url else {
            return Err(TrackError::MissingCoverArt(release.id));
        };

        let data = self.catalogs.coverart.fetch_image(&url, cancel).await?;
        track.set_picture(data, &url)?;
        tracing::debug!(url = %url, "Staged front cover");
        Ok(())
    }

    async fn encyclopedia_cover(
        &self,
        release: &Release,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichmentError> {
        let Some(group_id) = &release.release_group_id else {
            return Ok(None);
        };
        let group = self
            .catalogs
            .musicbrainz
            .release_group(group_id, cancel)
            .await?;
        self.catalogs
            .encyclopedia
            .album_cover_url(&group, cancel)
            .await
    }

    async fn add_genres(
        &self,
        track: &mut Track,
        cancel: &CancellationToken,
    ) -> Result<(), EnrichmentError> {
        let Some(album_id) = first_album_id(track) else {
            return Ok(());
        };

        let release = self.catalogs.musicbrainz.release(&album_id, cancel).await?;
        let Some(group_id) = release.release_group_id else {
            return Ok(());
        };
        let group = self
            .catalogs
            .musicbrainz
            .release_group(&group_id, cancel)
            .await?;

        let genres: Vec<String> = group
            .genres
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if !genres.is_empty() {
            track.set_genres(genres);
        }
        Ok(())
    }

    async fn add_lyrics(
        &self,
        track: &mut Track,
        cancel: &CancellationToken,
    ) -> Result<(), TrackError> {
        let single = |tag| track.single_tag(tag).map(str::to_string);
        let (Some(title), Some(artist), Some(album)) = (
            single(TagName::Title),
            single(TagName::Artist),
            single(TagName::Album),
        ) else {
            return Ok(());
        };
        let international = self.international_artists.contains(&artist);

        let lyrics = match self
            .catalogs
            .lyrics
            .find_lyrics(&title, &artist, &album, cancel)
            .await
        {
            Ok(lyrics) => lyrics,
            Err(EnrichmentError::NoMatches) => {
                tracing::debug!("No lyrics found");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        if lyrics.instrumental {
            return Ok(());
        }

        match (lyrics.synced, lyrics.plain) {
            (Some(synced), _) => {
                let text = tidy_lyrics(&synced, international);
                if !text.is_empty() {
                    track.set_synced_lyrics(text)?;
                }
            }
            (None, Some(plain)) => {
                let text = tidy_lyrics(&plain, international);
                if !text.is_empty() {
                    track.set_unsynced_lyrics(text)?;
                }
            }
            (None, None) => {
                return Err(
                    EnrichmentError::InvalidResponse("lyrics was empty".to_string()).into(),
                );
            }
        }
        Ok(())
    }
}

fn first_album_id(track: &Track) -> Option<String> {
    track.tag(TagName::MusicBrainzAlbumId).first().cloned()
}

/// The front image if one is flagged, otherwise the first listed.
fn pick_cover(images: &[CoverImage]) -> Option<String> {
    images
        .iter()
        .find(|image| image.front)
        .or_else(|| images.first())
        .map(|image| image.url.clone())
}
