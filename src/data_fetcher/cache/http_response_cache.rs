use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::LazyLock;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::types::CachedHttpResponse;
use crate::constants::HTTP_RESPONSE_CACHE_CAPACITY;

// LRU cache structure for HTTP responses with TTL support
pub static HTTP_RESPONSE_CACHE: LazyLock<RwLock<LruCache<String, CachedHttpResponse>>> =
    LazyLock::new(|| {
        let capacity = NonZeroUsize::new(HTTP_RESPONSE_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        RwLock::new(LruCache::new(capacity))
    });

/// Caches HTTP response data with TTL
#[instrument(skip(url, data), fields(url = %url))]
pub async fn cache_http_response(url: String, data: String, ttl_seconds: u64) {
    debug!(
        "Caching HTTP response: url={}, data_size={}, ttl={}s",
        url,
        data.len(),
        ttl_seconds
    );

    let cached_data = CachedHttpResponse::new(data, ttl_seconds);
    HTTP_RESPONSE_CACHE.write().await.put(url, cached_data);
}

/// Retrieves cached HTTP response if it's not expired
#[instrument(skip(url), fields(url = %url))]
pub async fn get_cached_http_response(url: &str) -> Option<String> {
    let mut cache = HTTP_RESPONSE_CACHE.write().await;

    let Some(cached_entry) = cache.get(url) else {
        debug!("Cache miss for HTTP response: url={}", url);
        return None;
    };

    if cached_entry.is_expired() {
        debug!(
            "Removing expired HTTP response cache entry: url={}, age={:?}, ttl={:?}",
            url,
            cached_entry.cached_at.elapsed(),
            cached_entry.ttl()
        );
        cache.pop(url);
        return None;
    }

    debug!(
        "Cache hit for HTTP response: url={}, expires_in={:?}",
        url,
        cached_entry.time_until_expiry()
    );
    Some(cached_entry.data.clone())
}

/// Gets the current HTTP response cache size for monitoring purposes
pub async fn get_http_response_cache_size() -> usize {
    HTTP_RESPONSE_CACHE.read().await.len()
}

/// Clears all HTTP response cache entries
pub async fn clear_http_response_cache() {
    let mut cache = HTTP_RESPONSE_CACHE.write().await;
    let evicted = cache.len();
    cache.clear();
    debug!("Cleared HTTP response cache ({} entries)", evicted);
}
