//! Cover Art Archive HTTP client
//!
//! Lists album artwork for MusicBrainz releases and downloads image bytes.
//! No API key required, but please respect their rate limits.
//!
//! API: https://coverartarchive.org

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::dto;
use crate::cache::RemoteCache;
use crate::enrichment::domain::{CoverImage, EnrichmentError};
use crate::enrichment::http;

/// Cover Art Archive client
pub struct CoverArtClient {
    cache: Arc<RemoteCache>,
    base_url: String,
}

impl CoverArtClient {
    pub fn new(cache: Arc<RemoteCache>, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            base_url: base_url.into(),
        }
    }

    /// List all cover art for a release. A release without art lists nothing.
    pub async fn list_images(
        &self,
        release_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<CoverImage>, EnrichmentError> {
        let url = format!(
            "{}/release/{}",
            http::base(&self.base_url),
            urlencoding::encode(release_id)
        );

        match http::get_json::<dto::CoverArtResponse>(&self.cache, &url, cancel).await {
            Ok(listing) => Ok(listing
                .images
                .into_iter()
                .map(|image| CoverImage {
                    url: image.image,
                    front: image.front,
                })
                .collect()),
            Err(EnrichmentError::NoMatches) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Download an image from any URL
    pub async fn fetch_image(
        &self,
        url: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, EnrichmentError> {
        let response = http::get(&self.cache, url, cancel).await?;
        http::check_status(&response, url)?;
        Ok(response.body.clone())
    }
}
