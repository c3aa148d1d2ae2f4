//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to 1 req/sec.
//! Both are enforced by the shared [`RemoteCache`] this client sends through.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{adapter, dto};
use crate::cache::RemoteCache;
use crate::enrichment::domain::{EnrichmentError, Release, ReleaseGroup};
use crate::enrichment::http;

/// MusicBrainz API client
pub struct MusicBrainzClient {
    cache: Arc<RemoteCache>,
    base_url: String,
}

impl MusicBrainzClient {
    pub fn new(cache: Arc<RemoteCache>, base_url: impl Into<String>) -> Self {
        Self {
            cache,
            base_url: base_url.into(),
        }
    }

    /// Releases containing a disc with this disc ID. Unknown IDs yield none.
    pub async fn releases_by_disc_id(
        &self,
        disc_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Release>, EnrichmentError> {
        let url = format!(
            "{}/discid/{}?fmt=json",
            http::base(&self.base_url),
            urlencoding::encode(disc_id)
        );

        match http::get_json::<dto::DiscIdResponse>(&self.cache, &url, cancel).await {
            Ok(response) => Ok(adapter::to_releases(response)),
            Err(EnrichmentError::NoMatches) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    /// Look up a release, including its release group.
    pub async fn release(
        &self,
        release_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Release, EnrichmentError> {
        let url = format!(
            "{}/release/{}?inc=release-groups&fmt=json",
            http::base(&self.base_url),
            urlencoding::encode(release_id)
        );

        let release: dto::Release = http::get_json(&self.cache, &url, cancel).await?;
        Ok(adapter::to_release(release))
    }

    /// Look up a release group with its URL relations and genres.
    pub async fn release_group(
        &self,
        release_group_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ReleaseGroup, EnrichmentError> {
        let url = format!(
            "{}/release-group/{}?inc=url-rels+genres&fmt=json",
            http::base(&self.base_url),
            urlencoding::encode(release_group_id)
        );

        let group: dto::ReleaseGroup = http::get_json(&self.cache, &url, cancel).await?;
        Ok(adapter::to_release_group(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::testing::{CountingTransport, cache_over};

    const BASE: &str = "http://mb.test/ws/2";

    fn client(transport: &Arc<CountingTransport>) -> MusicBrainzClient {
        MusicBrainzClient::new(Arc::new(cache_over(Arc::clone(transport))), format!("{BASE}/"))
    }

    #[tokio::test]
    async fn test_unknown_disc_id_is_empty() {
        let transport = Arc::new(CountingTransport::new());
        let releases = client(&transport)
            .releases_by_disc_id("nope", &CancellationToken::new())
            .await
            .unwrap();
        assert!(releases.is_empty());
    }

    #[tokio::test]
    async fn test_disc_id_lookup() {
        let transport = Arc::new(CountingTransport::new());
        transport.respond(
            &format!("{BASE}/discid/abc.def-?fmt=json"),
            r#"{"releases": [{"id": "r1", "title": "A", "country": "GB", "media": [{"format": "CD"}]}]}"#,
        );

        let releases = client(&transport)
            .releases_by_disc_id("abc.def-", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].id, "r1");
    }

    #[tokio::test]
    async fn test_release_lookup_is_cached() {
        let transport = Arc::new(CountingTransport::new());
        transport.respond(
            &format!("{BASE}/release/r1?inc=release-groups&fmt=json"),
            r#"{"id": "r1", "title": "A", "cover-art-archive": {"count": 1}, "release-group": {"id": "rg1"}}"#,
        );
        let client = client(&transport);
        let cancel = CancellationToken::new();

        let first = client.release("r1", &cancel).await.unwrap();
        let second = client.release("r1", &cancel).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.release_group_id.as_deref(), Some("rg1"));
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_release_group_lookup() {
        let transport = Arc::new(CountingTransport::new());
        transport.respond(
            &format!("{BASE}/release-group/rg1?inc=url-rels+genres&fmt=json"),
            r#"{"id": "rg1", "genres": [{"name": "rock"}], "relations": []}"#,
        );

        let group = client(&transport)
            .release_group("rg1", &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(group.genres, vec!["rock"]);
    }

    #[tokio::test]
    async fn test_missing_release_is_no_matches() {
        let transport = Arc::new(CountingTransport::new());
        let result = client(&transport)
            .release("missing", &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(EnrichmentError::NoMatches)));
    }
}
