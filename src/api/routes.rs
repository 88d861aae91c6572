//! API Routes
//!
//! Configures the Axum router with all proxy endpoints.

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use super::handlers::{
    country_handler, country_list_handler, genre_handler, genre_list_handler, health_handler,
    image_handler, listing_handler, movie_detail_handler, movie_detail_query_handler,
    new_releases_handler, search_handler, stats_handler, year_handler, AppState,
};

/// Builds the CORS policy for the trusted front-end origins.
///
/// Credentials are allowed, so origins, methods and headers are all explicit
/// lists rather than wildcards.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/phim-moi` - Newly updated movies
/// - `GET /api/phim/:slug`, `GET /api/phim?slug=` - Movie detail
/// - `GET /api/tim-kiem` - Keyword search
/// - `GET /api/the-loai`, `GET /api/the-loai/:slug` - Genres
/// - `GET /api/quoc-gia`, `GET /api/quoc-gia/:slug` - Countries
/// - `GET /api/nam/:year` - Movies by release year
/// - `GET /api/danh-sach/:list` - Curated lists
/// - `GET /api/image` - Redirect to the image transcoder
/// - `GET /api/cache/stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    Router::new()
        .route("/api/phim-moi", get(new_releases_handler))
        .route("/api/phim", get(movie_detail_query_handler))
        .route("/api/phim/:slug", get(movie_detail_handler))
        .route("/api/tim-kiem", get(search_handler))
        .route("/api/the-loai", get(genre_list_handler))
        .route("/api/the-loai/:slug", get(genre_handler))
        .route("/api/quoc-gia", get(country_list_handler))
        .route("/api/quoc-gia/:slug", get(country_handler))
        .route("/api/nam/:year", get(year_handler))
        .route("/api/danh-sach/:list", get(listing_handler))
        .route("/api/image", get(image_handler))
        .route("/api/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    const FRONTEND: &str = "http://localhost:3000";

    fn create_test_app() -> Router {
        let config = Config::default();
        let state = AppState::from_config(&config).unwrap();
        create_router(state, &config.allowed_origins)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_keyword_is_bad_request() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tim-kiem?page=2")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed_origin() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/phim-moi")
                    .header(header::ORIGIN, FRONTEND)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], FRONTEND);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("GET"));
        assert!(methods.contains("DELETE"));
    }

    #[tokio::test]
    async fn test_cors_unknown_origin_not_echoed() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "https://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
