//! Request and Response models for the proxy API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! deserializing query strings and serializing proxy-generated bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{DetailQuery, ImageQuery, ListingQuery, PageQuery, SearchQuery};
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
