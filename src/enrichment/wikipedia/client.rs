//! Wikipedia cover art lookup
//!
//! Follows a release group's `wikidata` URL relation to the Wikidata item,
//! takes the English Wikipedia sitelink, and asks Wikipedia for the images
//! used on that article. The first image filed under "Album covers" wins.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::dto;
use crate::cache::RemoteCache;
use crate::enrichment::domain::{EnrichmentError, ReleaseGroup};
use crate::enrichment::http;

const ALBUM_COVERS_CATEGORY: &str = "Category:Album covers";

/// Wikidata + Wikipedia client
pub struct WikipediaClient {
    cache: Arc<RemoteCache>,
    wikipedia_url: String,
    wikidata_url: String,
}

impl WikipediaClient {
    pub fn new(
        cache: Arc<RemoteCache>,
        wikipedia_url: impl Into<String>,
        wikidata_url: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            wikipedia_url: wikipedia_url.into(),
            wikidata_url: wikidata_url.into(),
        }
    }

    /// Album cover URL for a release group, if Wikipedia has one.
    pub async fn album_cover_url(
        &self,
        release_group: &ReleaseGroup,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichmentError> {
        let Some(item_url) = release_group.url_for("wikidata") else {
            tracing::debug!(release_group = %release_group.id, "No wikidata relation");
            return Ok(None);
        };
        let Some(item_id) = item_url.rsplit('/').next().filter(|id| !id.is_empty()) else {
            return Err(EnrichmentError::InvalidResponse(format!(
                "wikidata relation without an item id: {item_url}"
            )));
        };

        let Some(title) = self.english_title(item_id, cancel).await? else {
            tracing::debug!(item = item_id, "No English Wikipedia article");
            return Ok(None);
        };

        self.cover_for_article(&title, cancel).await
    }

    async fn english_title(
        &self,
        item_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichmentError> {
        let url = format!(
            "{}/{}?_fields=sitelinks",
            http::base(&self.wikidata_url),
            urlencoding::encode(item_id)
        );
        let mut item: dto::WikidataItem = http::get_json(&self.cache, &url, cancel).await?;
        Ok(item.sitelinks.remove("enwiki").map(|link| link.title))
    }

    async fn cover_for_article(
        &self,
        title: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, EnrichmentError> {
        let url = format!(
            "{}?action=query&format=json&prop=pageimages%7Ccategories&titles={}&generator=images&formatversion=2&piprop=original",
            self.wikipedia_url,
            urlencoding::encode(title)
        );
        let response: dto::QueryResponse = http::get_json(&self.cache, &url, cancel).await?;

        let pages = response.query.map(|q| q.pages).unwrap_or_default();
        Ok(pages
            .into_iter()
            .filter(|page| page.pageid != 0)
            .find(|page| {
                page.categories
                    .iter()
                    .any(|cat| cat.title == ALBUM_COVERS_CATEGORY)
            })
            .and_then(|page| page.original)
            .map(|original| original.source))
    }
}
