//! Request helpers shared by the catalog clients.
//!
//! Every request goes through the run's [`RemoteCache`]; these helpers turn
//! the captured response into a typed result.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::domain::EnrichmentError;
use crate::cache::{CachedResponse, RemoteCache, RemoteRequest};

/// Send a GET through the cache, whatever the response status.
pub(crate) async fn get(
    cache: &RemoteCache,
    url: &str,
    cancel: &CancellationToken,
) -> Result<Arc<CachedResponse>, EnrichmentError> {
    let request = RemoteRequest::get_str(url)?;
    Ok(cache.fetch(&request, cancel).await?)
}

/// Map a non-2xx response to an error. 404 is the distinct "no match".
pub(crate) fn check_status(response: &CachedResponse, url: &str) -> Result<(), EnrichmentError> {
    if response.is_not_found() {
        return Err(EnrichmentError::NoMatches);
    }
    if !response.is_success() {
        return Err(EnrichmentError::Http {
            status: response.status,
            url: url.to_string(),
        });
    }
    Ok(())
}

/// GET `url` and decode a successful JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    cache: &RemoteCache,
    url: &str,
    cancel: &CancellationToken,
) -> Result<T, EnrichmentError> {
    let response = get(cache, url, cancel).await?;
    check_status(&response, url)?;
    if let Some(content_type) = response.header("content-type") {
        if !content_type.contains("json") {
            return Err(EnrichmentError::Parse(format!(
                "{url}: expected JSON, got {content_type}"
            )));
        }
    }
    response
        .json()
        .map_err(|e| EnrichmentError::Parse(format!("{url}: {e}")))
}

/// Strip trailing slashes so paths can be appended with `/`.
pub(crate) fn base(url: &str) -> &str {
    url.trim_end_matches('/')
}
