//! Deduplicating, per-host rate-limited access to remote catalogs.
//!
//! Every catalog request goes through one [`RemoteCache`] owned by the run.
//! A request is identified by `METHOD URL`; the first completed response for
//! an identity is kept for the rest of the run and replayed to later callers
//! without touching the network. Before a request leaves the process it
//! waits for a slot from a keyed GCRA limiter: one request per interval per
//! host, burst of one.
//!
//! Concurrent first requests for the same identity may both reach the
//! network; the last one to finish wins. Failed requests are never stored.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use parking_lot::RwLock;
use reqwest::{Method, Url};
use tokio_util::sync::CancellationToken;

use crate::config::ConfigError;

/// Errors from [`RemoteCache::fetch`].
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("request cancelled")]
    Cancelled,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// An idempotent outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRequest {
    pub method: Method,
    pub url: Url,
}

impl RemoteRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
        }
    }

    /// Parse `url` and build a GET request for it.
    pub fn get_str(url: &str) -> Result<Self, CacheError> {
        Url::parse(url)
            .map(Self::get)
            .map_err(|e| CacheError::InvalidUrl(format!("{url}: {e}")))
    }

    /// Cache identity of this request.
    pub fn key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Rate-limit bucket: host plus explicit port.
    fn host(&self) -> Result<String, CacheError> {
        let host = self
            .url
            .host_str()
            .ok_or_else(|| CacheError::InvalidUrl(self.url.to_string()))?;
        Ok(match self.url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        })
    }
}

/// A captured response. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CachedResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Performs one network round trip.
///
/// Implemented over reqwest for real runs and by counting doubles in tests.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &RemoteRequest) -> Result<CachedResponse, CacheError>;
}

/// HTTP transport backed by a shared reqwest client.
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self, CacheError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CacheError::Transport(e.to_string()))?;
        Ok(Self { http_client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &RemoteRequest) -> Result<CachedResponse, CacheError> {
        let response = self
            .http_client
            .request(request.method.clone(), request.url.clone())
            .send()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Transport(e.to_string()))?
            .to_vec();

        Ok(CachedResponse {
            status,
            headers,
            body,
        })
    }
}

/// Run-scoped response cache with a per-host rate limiter.
pub struct RemoteCache {
    transport: Arc<dyn Transport>,
    entries: RwLock<HashMap<String, Arc<CachedResponse>>>,
    limiter: DefaultKeyedRateLimiter<String>,
}

impl RemoteCache {
    /// Create a cache that spaces requests to one host `interval` apart.
    pub fn new(transport: Arc<dyn Transport>, interval: Duration) -> Result<Self, ConfigError> {
        let quota = Quota::with_period(interval)
            .ok_or(ConfigError::ZeroRateLimit)?
            .allow_burst(NonZeroU32::MIN);

        Ok(Self {
            transport,
            entries: RwLock::new(HashMap::new()),
            limiter: RateLimiter::keyed(quota),
        })
    }

    /// Return the stored response for `request`, or perform and store it.
    pub async fn fetch(
        &self,
        request: &RemoteRequest,
        cancel: &CancellationToken,
    ) -> Result<Arc<CachedResponse>, CacheError> {
        let key = request.key();
        let stored = self.entries.read().get(&key).cloned();
        if let Some(hit) = stored {
            tracing::trace!(request = %key, "Cache hit");
            return Ok(hit);
        }

        let host = request.host()?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CacheError::Cancelled),
            _ = self.limiter.until_key_ready(&host) => {}
        }

        let started = Instant::now();
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(CacheError::Cancelled),
            response = self.transport.execute(request) => response?,
        };
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Remote request"
        );

        let response = Arc::new(response);
        self.entries.write().insert(key, Arc::clone(&response));
        Ok(response)
    }

    /// Number of stored responses.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
