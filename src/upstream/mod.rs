//! Upstream Module
//!
//! The movie-catalog API this proxy sits in front of. Handlers only see the
//! [`Upstream`] trait so tests can swap the HTTP client for a counter.

mod client;

pub use client::HttpUpstream;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

// == Upstream Trait ==
/// Issues read-only GET requests against the catalog host.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetches and decodes the JSON document behind `request`.
    async fn get_json(&self, request: &UpstreamRequest) -> Result<Value, UpstreamError>;
}

// == Upstream Request ==
/// Path segments and query pairs relative to the upstream base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Unencoded path segments, e.g. `["v1", "api", "nam", "2024"]`
    pub segments: Vec<String>,
    /// Query pairs in the order they are sent
    pub query: Vec<(String, String)>,
}

impl UpstreamRequest {
    /// Creates a request for a fixed `/`-separated path.
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
            query: Vec::new(),
        }
    }

    /// Appends one path segment, encoded when the URL is built.
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Appends query pairs, skipping empty values.
    pub fn query<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .filter(|(_, v)| !v.is_empty()),
        );
        self
    }

    /// Returns the path part, for logging.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}

// == Upstream Error ==
/// Why an upstream fetch failed. The display text is surfaced to clients as
/// the error `details`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// Base URL could not be used to build request URLs
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection, TLS or timeout failure
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned status {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    /// Body was not valid JSON
    #[error("Malformed JSON from {url}: {message}")]
    Decode { url: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_splits_fixed_path() {
        let req = UpstreamRequest::new("/v1/api/tim-kiem/");
        assert_eq!(req.segments, vec!["v1", "api", "tim-kiem"]);
        assert_eq!(req.path(), "v1/api/tim-kiem");
    }

    #[test]
    fn test_request_segment_and_query() {
        let req = UpstreamRequest::new("phim")
            .segment("ngoi-nha")
            .query([("page", "1"), ("country", "")]);

        assert_eq!(req.segments, vec!["phim", "ngoi-nha"]);
        assert_eq!(req.query, vec![("page".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_status_error_display_carries_body() {
        let err = UpstreamError::Status {
            url: "https://phimapi.com/phim/x".to_string(),
            status: 500,
            body: "boom".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("boom"));
    }
}
