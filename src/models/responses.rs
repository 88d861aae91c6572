//! Response DTOs for the proxy API
//!
//! Bodies produced by the proxy itself. Catalog responses are passed through
//! as the upstream JSON.

use serde::Serialize;

use crate::cache::StatsSnapshot;

/// Response body for the stats endpoint (GET /api/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that went upstream
    pub misses: u64,
    /// Misses whose upstream fetch failed
    pub upstream_errors: u64,
    /// Stored entries, stale ones included
    pub total_entries: usize,
    /// Entries that would currently be served
    pub fresh_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Freshness window in seconds
    pub ttl_seconds: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(
        stats: StatsSnapshot,
        total_entries: usize,
        fresh_entries: usize,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            upstream_errors: stats.upstream_errors,
            total_entries,
            fresh_entries,
            hit_rate: stats.hit_rate(),
            ttl_seconds,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable description of what went wrong
    pub message: String,
    /// Raw upstream error text, when the failure came from upstream
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }

    /// Creates an ErrorResponse carrying diagnostic details
    pub fn with_details(message: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: Some(details.into()),
        }
    }
}
