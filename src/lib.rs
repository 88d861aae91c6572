//! Phim Proxy - A caching reverse proxy for the phimapi movie catalog
//!
//! Re-exposes the catalog's read-only endpoints and keeps every upstream
//! response in a process-wide TTL cache.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{ProxyError, Result};
