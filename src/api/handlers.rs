//! API Handlers
//!
//! HTTP request handlers for each proxied catalog endpoint. Each handler
//! validates its parameters, builds an [`Operation`] and hands it to the
//! catalog service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use super::extract::{ApiPath, ApiQuery};
use crate::cache::TtlCache;
use crate::catalog::{CatalogService, ListType, ListingFilters, Operation};
use crate::config::Config;
use crate::error::Result;
use crate::models::requests::{parse_year, require};
use crate::models::{
    DetailQuery, HealthResponse, ImageQuery, ListingQuery, PageQuery, SearchQuery, StatsResponse,
};
use crate::upstream::{HttpUpstream, UpstreamError, UpstreamRequest};

/// Image transcoder path on the catalog host
const IMAGE_ENDPOINT_PATH: &str = "image.php";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cache-fronted catalog access
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Creates a new AppState around the given service.
    pub fn new(catalog: CatalogService) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the HTTP upstream client and an empty cache with the configured
    /// TTL.
    pub fn from_config(config: &Config) -> std::result::Result<Self, UpstreamError> {
        let upstream = HttpUpstream::new(&config.upstream_base_url, config.upstream_timeout())?;
        let image_endpoint = upstream.url_for(&UpstreamRequest::new(IMAGE_ENDPOINT_PATH))?;
        let cache = TtlCache::new(config.cache_ttl);

        Ok(Self::new(CatalogService::new(
            Arc::new(upstream),
            cache,
            image_endpoint,
        )))
    }

    async fn fetch(&self, op: Operation) -> Result<Json<Arc<Value>>> {
        Ok(Json(self.catalog.fetch(&op).await?))
    }
}

/// Handler for GET /api/phim-moi
pub async fn new_releases_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Arc<Value>>> {
    let page = query.page()?;
    state.fetch(Operation::NewReleases { page }).await
}

/// Handler for GET /api/phim/:slug
pub async fn movie_detail_handler(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> Result<Json<Arc<Value>>> {
    let slug = require("slug", Some(slug.as_str()))?;
    state.fetch(Operation::MovieDetail { slug }).await
}

/// Handler for GET /api/phim?slug=
pub async fn movie_detail_query_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<DetailQuery>,
) -> Result<Json<Arc<Value>>> {
    let slug = query.slug()?;
    state.fetch(Operation::MovieDetail { slug }).await
}

/// Handler for GET /api/tim-kiem
pub async fn search_handler(
    State(state): State<AppState>,
    ApiQuery(search): ApiQuery<SearchQuery>,
    ApiQuery(listing): ApiQuery<ListingQuery>,
) -> Result<Json<Arc<Value>>> {
    let keyword = search.keyword()?;
    let filters = listing.filters()?;
    state.fetch(Operation::Search { keyword, filters }).await
}

/// Handler for GET /api/the-loai/:slug
pub async fn genre_handler(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(listing): ApiQuery<ListingQuery>,
) -> Result<Json<Arc<Value>>> {
    let (slug, filters) = slug_and_filters(&slug, &listing)?;
    state.fetch(Operation::Genre { slug, filters }).await
}

/// Handler for GET /api/quoc-gia/:slug
pub async fn country_handler(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(listing): ApiQuery<ListingQuery>,
) -> Result<Json<Arc<Value>>> {
    let (slug, filters) = slug_and_filters(&slug, &listing)?;
    state.fetch(Operation::Country { slug, filters }).await
}

/// Handler for GET /api/nam/:year
pub async fn year_handler(
    State(state): State<AppState>,
    ApiPath(year): ApiPath<String>,
    ApiQuery(listing): ApiQuery<ListingQuery>,
) -> Result<Json<Arc<Value>>> {
    let year = parse_year(&year)?;
    let filters = listing.filters()?;
    state.fetch(Operation::Year { year, filters }).await
}

/// Handler for GET /api/danh-sach/:list
pub async fn listing_handler(
    State(state): State<AppState>,
    ApiPath(list): ApiPath<String>,
    ApiQuery(listing): ApiQuery<ListingQuery>,
) -> Result<Json<Arc<Value>>> {
    let list = ListType::parse(list.trim())?;
    let filters = listing.filters()?;
    state.fetch(Operation::Listing { list, filters }).await
}

/// Handler for GET /api/the-loai
pub async fn genre_list_handler(State(state): State<AppState>) -> Result<Json<Arc<Value>>> {
    state.fetch(Operation::GenreList).await
}

/// Handler for GET /api/quoc-gia
pub async fn country_list_handler(State(state): State<AppState>) -> Result<Json<Arc<Value>>> {
    state.fetch(Operation::CountryList).await
}

/// Handler for GET /api/image
///
/// Answers with a 302 to the catalog's image transcoder.
pub async fn image_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ImageQuery>,
) -> Result<Response> {
    let image = query.image()?;
    let target = state.catalog.image_target(&image);

    Ok((StatusCode::FOUND, [(header::LOCATION, &*target)]).into_response())
}

/// Handler for GET /api/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.catalog.cache();
    Json(StatsResponse::new(
        state.catalog.stats(),
        cache.len(),
        cache.fresh_len(),
        cache.ttl().as_secs(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

fn slug_and_filters(slug: &str, listing: &ListingQuery) -> Result<(String, ListingFilters)> {
    Ok((require("slug", Some(slug))?, listing.filters()?))
}
