//! Error types for the proxy
//!
//! Provides unified error handling using thiserror. Every variant maps to a
//! JSON body with a stable `message` and, for upstream failures, the raw
//! `details`.

use axum::{
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::upstream::UpstreamError;

/// Message returned for every upstream failure
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to fetch data from upstream";

// == Proxy Error Enum ==
/// Unified error type for the proxy.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Missing or malformed request parameter
    #[error("{0}")]
    Validation(String),

    /// Upstream fetch failed; never cached
    #[error("Failed to fetch data from upstream: {0}")]
    Upstream(#[from] UpstreamError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ProxyError {
    /// Returns the HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) | ProxyError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == Extractor Rejections ==
impl From<QueryRejection> for ProxyError {
    fn from(rejection: QueryRejection) -> Self {
        ProxyError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ProxyError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_client_error() {
            ProxyError::Validation(rejection.body_text())
        } else {
            ProxyError::Internal(rejection.body_text())
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ProxyError::Validation(msg) => ErrorResponse::new(msg),
            ProxyError::Upstream(err) => {
                ErrorResponse::with_details(UPSTREAM_FAILURE_MESSAGE, err.to_string())
            }
            ProxyError::Internal(msg) => ErrorResponse::new(format!("Internal error: {}", msg)),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
