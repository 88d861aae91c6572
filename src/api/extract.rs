//! Request Extractors
//!
//! Thin wrappers over axum's `Query` and `Path` whose rejections become
//! [`ProxyError`], so malformed parameters get the same JSON error body as
//! every other client error.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ProxyError;

/// Query string extractor rejecting with [`ProxyError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Path parameter extractor rejecting with [`ProxyError`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ProxyError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PageQuery;
    use axum::http::Request;

    fn parts(uri: &str) -> Parts {
        Request::builder().uri(uri).body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_query_extracts_fields() {
        let mut parts = parts("/api/phim-moi?page=3");

        let ApiQuery(query) = ApiQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(query.page.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_duplicate_query_field_is_validation_error() {
        let mut parts = parts("/api/phim-moi?page=1&page=2");

        let err = ApiQuery::<PageQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();

        match err {
            ProxyError::Validation(msg) => assert!(msg.contains("page")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
