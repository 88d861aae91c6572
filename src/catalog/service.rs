//! Catalog Service
//!
//! Runs an operation through the TTL cache: hit returns the stored payload,
//! miss calls upstream and stores the result. Failures are never stored.
//!
//! Concurrent misses on the same key are not coalesced; each one calls
//! upstream and the last `put` wins.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::cache::{CacheKey, CacheStats, StatsSnapshot, TtlCache};
use crate::catalog::{ImageRedirect, Operation};
use crate::error::Result;
use crate::upstream::Upstream;

// == Cached Payload ==
/// What the cache stores for one key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedPayload {
    /// Upstream JSON document
    Json(Arc<Value>),
    /// Resolved image redirect target
    Redirect(Arc<str>),
}

// == Catalog Service ==
/// Cache-fronted access to the catalog.
pub struct CatalogService {
    cache: TtlCache<CachedPayload>,
    stats: CacheStats,
    upstream: Arc<dyn Upstream>,
    image_endpoint: Url,
}

impl CatalogService {
    // == Constructor ==
    /// Creates a service over `upstream`, storing results in `cache`.
    ///
    /// `image_endpoint` is the transcoder URL image redirects point at.
    pub fn new(
        upstream: Arc<dyn Upstream>,
        cache: TtlCache<CachedPayload>,
        image_endpoint: Url,
    ) -> Self {
        Self {
            cache,
            stats: CacheStats::new(),
            upstream,
            image_endpoint,
        }
    }

    /// Returns the underlying cache.
    pub fn cache(&self) -> &TtlCache<CachedPayload> {
        &self.cache
    }

    /// Returns current hit/miss counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // == Fetch ==
    /// Returns the JSON for `op`, from cache when fresh.
    #[instrument(skip_all, fields(op = op.name()))]
    pub async fn fetch(&self, op: &Operation) -> Result<Arc<Value>> {
        let key = op.cache_key();
        if let Some(CachedPayload::Json(value)) = self.lookup(&key) {
            return Ok(value);
        }

        let request = op.upstream_request();
        let value = match self.upstream.get_json(&request).await {
            Ok(value) => Arc::new(value),
            Err(err) => {
                self.stats.record_upstream_error();
                warn!(key = %key, error = %err, "Upstream fetch failed, not caching");
                return Err(err.into());
            }
        };

        self.store(key, CachedPayload::Json(value.clone()));
        Ok(value)
    }

    // == Image Redirect ==
    /// Returns the redirect target for `image`, from cache when fresh.
    pub fn image_target(&self, image: &ImageRedirect) -> Arc<str> {
        let key = image.cache_key();
        if let Some(CachedPayload::Redirect(target)) = self.lookup(&key) {
            return target;
        }

        let target: Arc<str> = Arc::from(image.target(&self.image_endpoint).as_str());
        self.store(key, CachedPayload::Redirect(target.clone()));
        target
    }

    fn lookup(&self, key: &CacheKey) -> Option<CachedPayload> {
        match self.cache.get(key.as_str()) {
            Some(payload) => {
                self.stats.record_hit();
                debug!(key = %key, "Cache hit");
                Some(payload)
            }
            None => {
                self.stats.record_miss();
                debug!(key = %key, "Cache miss");
                None
            }
        }
    }

    fn store(&self, key: CacheKey, payload: CachedPayload) {
        let now = self.cache.now();
        self.cache.put(key.into_string(), payload, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::catalog::ListingFilters;
    use crate::error::ProxyError;
    use crate::upstream::{UpstreamError, UpstreamRequest};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(900);

    /// Upstream stub that records every request and can be told to fail.
    #[derive(Default)]
    struct RecordingUpstream {
        requests: Mutex<Vec<UpstreamRequest>>,
        fail: Mutex<bool>,
    }

    impl RecordingUpstream {
        fn calls(&self) -> usize {
            self.requests.lock().len()
        }
    }

    #[async_trait]
    impl Upstream for RecordingUpstream {
        async fn get_json(
            &self,
            request: &UpstreamRequest,
        ) -> std::result::Result<Value, UpstreamError> {
            let call = {
                let mut requests = self.requests.lock();
                requests.push(request.clone());
                requests.len()
            };
            if *self.fail.lock() {
                return Err(UpstreamError::Status {
                    url: request.path(),
                    status: 500,
                    body: "simulated failure".to_string(),
                });
            }
            Ok(json!({ "path": request.path(), "call": call }))
        }
    }

    fn service() -> (CatalogService, Arc<RecordingUpstream>, ManualClock) {
        let upstream = Arc::new(RecordingUpstream::default());
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(TTL, Arc::new(clock.clone()));
        let endpoint = Url::parse("https://phimapi.com/image.php").unwrap();
        (
            CatalogService::new(upstream.clone(), cache, endpoint),
            upstream,
            clock,
        )
    }

    #[tokio::test]
    async fn test_second_fetch_is_served_from_cache() {
        let (service, upstream, _clock) = service();
        let op = Operation::NewReleases { page: 1 };

        let first = service.fetch(&op).await.unwrap();
        let second = service.fetch(&op).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(upstream.calls(), 1);
        let stats = service.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[tokio::test]
    async fn test_detail_is_cached_under_slug_key() {
        let (service, upstream, _clock) = service();
        let op = Operation::MovieDetail {
            slug: "ngoi-nha-nho-tren-thao-nguyen".to_string(),
        };

        service.fetch(&op).await.unwrap();

        assert!(service
            .cache()
            .get("phim:ngoi-nha-nho-tren-thao-nguyen")
            .is_some());
        service.fetch(&op).await.unwrap();
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_triggers_refetch() {
        let (service, upstream, clock) = service();
        let op = Operation::GenreList;

        let first = service.fetch(&op).await.unwrap();
        clock.advance(TTL);
        let second = service.fetch(&op).await.unwrap();

        assert_eq!(upstream.calls(), 2);
        assert_ne!(first, second);
        assert_eq!(service.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_cached() {
        let (service, upstream, _clock) = service();
        let op = Operation::MovieDetail {
            slug: "broken".to_string(),
        };
        *upstream.fail.lock() = true;

        let err = service.fetch(&op).await.unwrap_err();
        assert!(matches!(err, ProxyError::Upstream(_)));
        assert!(service.cache().is_empty());
        assert_eq!(service.stats().upstream_errors, 1);

        // Next call goes upstream again and succeeds
        *upstream.fail.lock() = false;
        service.fetch(&op).await.unwrap();
        assert_eq!(upstream.calls(), 2);
        assert_eq!(service.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_different_filters_use_different_entries() {
        let (service, upstream, _clock) = service();
        let page1 = Operation::Search {
            keyword: "ma".to_string(),
            filters: ListingFilters::default(),
        };
        let page2 = Operation::Search {
            keyword: "ma".to_string(),
            filters: ListingFilters {
                page: 2,
                ..ListingFilters::default()
            },
        };

        service.fetch(&page1).await.unwrap();
        service.fetch(&page2).await.unwrap();

        assert_eq!(upstream.calls(), 2);
        assert_eq!(service.cache().len(), 2);
    }

    /// Upstream that holds every call until `n` calls are in flight.
    struct GatedUpstream {
        gate: tokio::sync::Barrier,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl Upstream for GatedUpstream {
        async fn get_json(
            &self,
            _request: &UpstreamRequest,
        ) -> std::result::Result<Value, UpstreamError> {
            let call = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.gate.wait().await;
            Ok(json!({ "call": call }))
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_call_upstream_and_one_entry_survives() {
        let upstream = Arc::new(GatedUpstream {
            gate: tokio::sync::Barrier::new(2),
            calls: Default::default(),
        });
        let service = CatalogService::new(
            upstream.clone(),
            TtlCache::new(TTL),
            Url::parse("https://phimapi.com/image.php").unwrap(),
        );
        let op = Operation::CountryList;

        let (first, second) = tokio::join!(service.fetch(&op), service.fetch(&op));

        let (first, second) = (first.unwrap(), second.unwrap());
        assert_ne!(first, second);
        assert_eq!(upstream.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
        assert_eq!(service.cache().len(), 1);
        let cached = service.fetch(&op).await.unwrap();
        assert!(cached == first || cached == second);
        assert_eq!(service.stats().misses, 2);
    }

    fn op_strategy() -> impl proptest::strategy::Strategy<Value = Operation> {
        use proptest::prelude::*;
        prop_oneof![
            (1u32..4).prop_map(|page| Operation::NewReleases { page }),
            "[a-c]{1,2}".prop_map(|slug| Operation::MovieDetail { slug }),
            Just(Operation::GenreList),
            (1u32..3).prop_map(|page| Operation::Genre {
                slug: "hanh-dong".to_string(),
                filters: ListingFilters {
                    page,
                    ..ListingFilters::default()
                },
            }),
        ]
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(64))]

        // Within one TTL window upstream is called once per distinct key
        #[test]
        fn prop_upstream_calls_match_distinct_keys(
            ops in proptest::collection::vec(op_strategy(), 1..30)
        ) {
            let (service, upstream, _clock) = service();
            tokio_test::block_on(async {
                for op in &ops {
                    service.fetch(op).await.unwrap();
                }
            });

            let distinct: std::collections::HashSet<_> =
                ops.iter().map(Operation::cache_key).collect();
            proptest::prop_assert_eq!(upstream.calls(), distinct.len());
            proptest::prop_assert_eq!(service.cache().len(), distinct.len());
            let stats = service.stats();
            proptest::prop_assert_eq!(stats.misses as usize, distinct.len());
            proptest::prop_assert_eq!((stats.hits + stats.misses) as usize, ops.len());
        }
    }

    #[test]
    fn test_image_target_is_cached() {
        let (service, upstream, _clock) = service();
        let image = ImageRedirect::parse("https://phimimg.com/a.jpg").unwrap();

        let first = service.image_target(&image);
        let second = service.image_target(&image);

        assert_eq!(first, second);
        assert!(first.starts_with("https://phimapi.com/image.php?url="));
        assert_eq!(service.stats().hits, 1);
        assert_eq!(upstream.calls(), 0);
    }
}
