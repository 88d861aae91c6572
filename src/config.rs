//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_CACHE_TTL;

/// Catalog host proxied by default
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://phimapi.com";

/// Front-end origins allowed when `CORS_ALLOWED_ORIGINS` is unset
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:5173"];

/// Proxy configuration parameters.
///
/// All values except the cache TTL can be configured via environment variables
/// with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port, bound on all interfaces
    pub server_port: u16,
    /// Base URL of the catalog API
    pub upstream_base_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout_secs: u64,
    /// Freshness window for cached responses
    pub cache_ttl: Duration,
    /// Origins allowed to call the proxy from a browser
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3001)
    /// - `UPSTREAM_BASE_URL` - Catalog API base (default: https://phimapi.com)
    /// - `UPSTREAM_TIMEOUT_SECS` - Upstream timeout in seconds (default: 10)
    /// - `CORS_ALLOWED_ORIGINS` - Comma-separated origin allow-list
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            upstream_base_url: env::var("UPSTREAM_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_base_url),
            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.upstream_timeout_secs),
            cache_ttl: defaults.cache_ttl,
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|v| parse_origins(&v))
                .filter(|origins| !origins.is_empty())
                .unwrap_or(defaults.allowed_origins),
        }
    }

    /// Upstream timeout as a Duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3001,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_timeout_secs: 10,
            cache_ttl: DEFAULT_CACHE_TTL,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

/// Splits a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(str::to_owned)
        .collect()
}
