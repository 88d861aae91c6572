//! API Module
//!
//! HTTP handlers and routing for the proxy's read-only REST API.
//!
//! # Endpoints
//! - `GET /api/phim-moi` - Newly updated movies
//! - `GET /api/phim/:slug` - Movie detail
//! - `GET /api/tim-kiem` - Keyword search
//! - `GET /api/the-loai/:slug`, `/api/quoc-gia/:slug`, `/api/nam/:year`,
//!   `/api/danh-sach/:list` - Filtered listings
//! - `GET /api/image` - Image transcoder redirect
//! - `GET /health` - Health check endpoint

pub mod extract;
pub mod handlers;
pub mod routes;

pub use extract::{ApiPath, ApiQuery};
pub use handlers::*;
pub use routes::{cors_layer, create_router};
