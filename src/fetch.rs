//! Network boundary: HTTP GET for stylesheets and images.
//!
//! The pipeline talks to the network through the [`Fetcher`] trait so tests
//! can substitute in-memory fakes. [`HttpFetcher`] is the built-in
//! implementation, backed by `reqwest` with streaming body reads.

use futures::StreamExt;
use reqwest::Client;
use url::Url;

use crate::error::{PageSaverError, Result};

/// Browser-like identity sent with every resource request. Some origins
/// refuse stylesheet and image requests from obvious non-browser agents.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// The body and declared media type of one fetched resource.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Raw response body.
    pub bytes: Vec<u8>,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
}

/// Trait for the network boundary consumed by the style collector and the
/// image inliner.
///
/// Implementations must be `Send + Sync + 'static` so a fetcher can be shared
/// across concurrently spawned save operations. A non-success HTTP status is
/// an error; no retries are performed.
pub trait Fetcher: Send + Sync + 'static {
    /// Issue a GET against `url` and return the response body.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedResource>> + Send;
}

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Refuse resources larger than this many bytes. `None` means unbounded;
    /// a hung or huge fetch then stalls only its own resource.
    pub max_resource_size: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_resource_size: None,
        }
    }
}

/// Fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a fetcher with the default configuration.
    pub fn new() -> Self {
        Self::with_config(FetchConfig::default())
    }

    /// Create a fetcher with an explicit [`FetchConfig`].
    pub fn with_config(config: FetchConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedResource> {
        let fetch_err = |reason: String| PageSaverError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.config.user_agent)
            .send()
            .await
            .map_err(|e| fetch_err(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP status {status}")));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if let Some(limit) = self.config.max_resource_size {
            let declared = response.content_length().unwrap_or(0);
            if declared > limit {
                return Err(fetch_err(format!(
                    "declared size {declared} exceeds limit {limit}"
                )));
            }
        }

        let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| fetch_err(e.to_string()))?;
            if let Some(limit) = self.config.max_resource_size {
                if (bytes.len() + chunk.len()) as u64 > limit {
                    return Err(fetch_err(format!("body exceeds limit of {limit} bytes")));
                }
            }
            bytes.extend_from_slice(&chunk);
        }

        Ok(FetchedResource {
            bytes,
            content_type,
        })
    }
}

/// Resolve a possibly-relative resource reference against the page address.
///
/// Falls back to the raw reference when no base is available or joining
/// fails; the subsequent fetch then reports the failure for that resource.
pub(crate) fn resolve_url(base: Option<&Url>, raw: &str) -> String {
    match base {
        Some(base) => base
            .join(raw)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => raw.to_string(),
    }
}
