//! In-memory image cache keyed by locator.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{ImageBytes, Locator};
use crate::domain::errors::FetchError;
use crate::domain::ports::Transport;

struct CacheInner {
    transport: Arc<dyn Transport>,
    entries: Mutex<HashMap<Locator, Arc<ImageBytes>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Maps locators to decoded images so each one is downloaded once.
///
/// Entries live until [`ImageByteCache::clear`]; there is no size bound.
/// The map is behind an async mutex that is never held across a fetch, so
/// downloads of different locators run concurrently. Concurrent misses on
/// the same locator are not coalesced: each of them fetches.
///
/// Cloning yields another handle to the same cache.
#[derive(Clone)]
pub struct ImageByteCache {
    inner: Arc<CacheInner>,
}

impl ImageByteCache {
    /// Creates an empty cache that downloads through `transport`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                transport,
                entries: Mutex::new(HashMap::new()),
                hits: AtomicU64::new(0),
                misses: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the image for `locator`, downloading it on a miss.
    ///
    /// # Errors
    /// Returns `FetchError` if the request fails, the status is outside
    /// `[200, 300)`, or the body does not decode as an image. Failures are
    /// not cached.
    pub async fn get(&self, locator: &Locator) -> Result<Arc<ImageBytes>, FetchError> {
        if let Some(cached) = self.inner.entries.lock().await.get(locator).cloned() {
            self.inner.hits.fetch_add(1, Ordering::Relaxed);
            trace!(url = %locator, "Image cache hit");
            return Ok(cached);
        }
        self.inner.misses.fetch_add(1, Ordering::Relaxed);

        debug!(url = %locator, "Image cache miss, downloading");

        let response = self.inner.transport.fetch(locator).await?;
        if !response.is_success() {
            warn!(url = %locator, status = response.status, "Image request rejected");
            return Err(FetchError::http_status(response.status));
        }

        let body = response.body;
        let image = tokio::task::spawn_blocking(move || ImageBytes::decode(body))
            .await
            .map_err(|e| FetchError::decode(format!("decode task failed: {e}")))??;
        let image = Arc::new(image);

        debug!(
            url = %locator,
            width = image.width(),
            height = image.height(),
            "Storing image in cache"
        );
        self.inner
            .entries
            .lock()
            .await
            .insert(locator.clone(), Arc::clone(&image));

        Ok(image)
    }

    /// Returns true if `locator` is cached.
    pub async fn contains(&self, locator: &Locator) -> bool {
        self.inner.entries.lock().await.contains_key(locator)
    }

    /// Returns the number of cached images.
    pub async fn len(&self) -> usize {
        self.inner.entries.lock().await.len()
    }

    /// Returns true if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every entry. Later requests download again.
    pub async fn clear(&self) {
        let mut entries = self.inner.entries.lock().await;
        let count = entries.len();
        entries.clear();
        info!(count, "Cleared image cache");
    }

    /// Returns hit and miss counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let hits = self.inner.hits.load(Ordering::Relaxed);
        let misses = self.inner.misses.load(Ordering::Relaxed);
        CacheStats { hits, misses }
    }
}

impl std::fmt::Debug for ImageByteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageByteCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {:.1}% hit rate ({} hits, {} misses)",
            self.hit_rate(),
            self.hits,
            self.misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::fixtures;
    use crate::domain::ports::FetchResponse;
    use crate::domain::ports::mocks::MockTransport;
    use async_trait::async_trait;
    use tokio::sync::Barrier;

    fn locator(name: &str) -> Locator {
        Locator::parse(&format!("https://images.example.com/{name}.png")).unwrap()
    }

    fn serving_png(times: usize) -> MockTransport {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .times(times)
            .returning(|_| Ok(FetchResponse::new(200, fixtures::png(8, 6))));
        transport
    }

    #[tokio::test]
    async fn test_second_get_is_served_from_cache() {
        let cache = ImageByteCache::new(Arc::new(serving_png(1)));
        let url = locator("a");

        let first = cache.get(&url).await.unwrap();
        let second = cache.get(&url).await.unwrap();

        assert_eq!(first.as_bytes(), second.as_bytes());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.width(), 8);
        assert_eq!(cache.stats(), CacheStats { hits: 1, misses: 1 });
    }

    #[tokio::test]
    async fn test_distinct_locators_fetch_separately() {
        let cache = ImageByteCache::new(Arc::new(serving_png(2)));

        cache.get(&locator("a")).await.unwrap();
        cache.get(&locator("b")).await.unwrap();

        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_clear_forces_one_new_fetch() {
        let cache = ImageByteCache::new(Arc::new(serving_png(2)));
        let url = locator("a");

        cache.get(&url).await.unwrap();
        cache.clear().await;
        assert!(cache.is_empty().await);

        cache.get(&url).await.unwrap();
        cache.get(&url).await.unwrap();
        assert!(cache.contains(&url).await);
    }

    #[tokio::test]
    async fn test_non_success_status_is_surfaced() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .times(2)
            .returning(|_| Ok(FetchResponse::new(404, "not found")));
        let cache = ImageByteCache::new(Arc::new(transport));
        let url = locator("missing");

        let result = cache.get(&url).await;
        assert_eq!(result.unwrap_err(), FetchError::http_status(404));
        assert!(!cache.contains(&url).await);

        // Failures are not cached.
        assert!(cache.get(&url).await.is_err());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_surfaced() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(FetchResponse::new(200, "<html></html>")));
        let cache = ImageByteCache::new(Arc::new(transport));

        let result = cache.get(&locator("page")).await;

        assert!(matches!(result, Err(FetchError::Decode { .. })));
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch()
            .times(1)
            .returning(|_| Err(FetchError::transport("connection refused")));
        let cache = ImageByteCache::new(Arc::new(transport));

        let result = cache.get(&locator("a")).await;

        assert_eq!(result.unwrap_err(), FetchError::transport("connection refused"));
    }

    /// Holds every fetch until `parties` fetches are in flight at once.
    struct RendezvousTransport {
        barrier: Barrier,
        calls: AtomicU64,
    }

    #[async_trait]
    impl Transport for RendezvousTransport {
        async fn fetch(&self, _locator: &Locator) -> Result<FetchResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.barrier.wait().await;
            Ok(FetchResponse::new(200, fixtures::png(2, 2)))
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_are_not_coalesced() {
        let transport = Arc::new(RendezvousTransport {
            barrier: Barrier::new(2),
            calls: AtomicU64::new(0),
        });
        let cache = ImageByteCache::new(transport.clone());
        let url = locator("same");

        let (a, b) = tokio::join!(cache.get(&url), cache.get(&url));

        assert_eq!(a.unwrap().as_bytes(), b.unwrap().as_bytes());
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.stats().misses, 2);
    }

    #[tokio::test]
    async fn test_fetches_for_different_locators_overlap() {
        let transport = Arc::new(RendezvousTransport {
            barrier: Barrier::new(3),
            calls: AtomicU64::new(0),
        });
        let cache = ImageByteCache::new(transport.clone());
        let (a, b, c) = (locator("a"), locator("b"), locator("c"));

        let (ra, rb, rc) = tokio::join!(cache.get(&a), cache.get(&b), cache.get(&c));

        assert!(ra.is_ok() && rb.is_ok() && rc.is_ok());
        assert_eq!(cache.len().await, 3);
    }

    #[test]
    fn test_stats_display() {
        let stats = CacheStats { hits: 3, misses: 1 };
        assert_eq!(
            stats.to_string(),
            "Cache: 75.0% hit rate (3 hits, 1 misses)"
        );
    }
}
