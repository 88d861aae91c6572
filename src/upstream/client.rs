//! Upstream HTTP Client
//!
//! reqwest-backed implementation of [`Upstream`] with a bounded timeout.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::{Upstream, UpstreamError, UpstreamRequest};

/// Longest upstream error body kept in error details
const MAX_ERROR_BODY: usize = 512;

// == HTTP Upstream ==
/// Client for the catalog host.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    base_url: Url,
    http_client: reqwest::Client,
}

impl HttpUpstream {
    // == Constructor ==
    /// Creates a client for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(base_url.to_string()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("phim_proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Client(e.to_string()))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    // == URL Building ==
    /// Resolves `request` against the base URL, percent-encoding each segment.
    pub fn url_for(&self, request: &UpstreamRequest) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(&request.segments);
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    #[instrument(skip(self, request), fields(path = %request.path()))]
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = self.url_for(request)?;
        debug!(url = %url, "Fetching from upstream");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: error_body(response.text().await),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Truncated error body, or the read failure in its place.
fn error_body(text: reqwest::Result<String>) -> String {
    match text {
        Ok(body) => body.chars().take(MAX_ERROR_BODY).collect(),
        Err(e) => format!("<unreadable body: {}>", e),
    }
}
