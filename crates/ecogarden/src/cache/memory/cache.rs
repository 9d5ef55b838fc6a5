//! In-memory cache implementation with LRU eviction.
//!
//! Provides a thread-safe in-memory cache with TTL support using
//! tokio synchronization primitives and LRU eviction policy.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use ecogarden_core::cache::{Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    ttl: Option<Duration>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    /// Creates a new cache entry with optional TTL.
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self {
            value,
            ttl,
            expires_at,
        }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// In-memory cache implementation with LRU eviction.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>` for concurrent access.
/// Supports TTL with lazy expiration: expired entries read as misses and
/// are dropped when next touched.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` keys.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// TTL a live key was stored with.
    #[cfg(test)]
    pub(crate) async fn ttl_of(&self, key: &str) -> Option<Duration> {
        let store = self.store.read().await;
        store
            .peek(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| entry.ttl)
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // LRU reads reorder, so even lookups take the write lock.
        let mut store = self.store.write().await;

        match store.get(key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }

        store.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryCache::new(100);

        cache.set("key1", b"value1", None).await.unwrap();
        let result = cache.get("key1").await.unwrap();

        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let cache = MemoryCache::new(100);

        let result = cache.get("nonexistent").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryCache::new(100);

        cache
            .set("weather_paris", b"{}", Some(Duration::from_millis(20)))
            .await
            .unwrap();
        assert!(cache.get("weather_paris").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(cache.get("weather_paris").await.unwrap(), None);
        assert_eq!(cache.ttl_of("weather_paris").await, None);
    }

    #[tokio::test]
    async fn test_overwrite_resets_value_and_ttl() {
        let cache = MemoryCache::new(100);

        cache
            .set("k", b"old", Some(Duration::from_secs(1)))
            .await
            .unwrap();
        cache
            .set("k", b"new", Some(Duration::from_secs(3600)))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(cache.ttl_of("k").await, Some(Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        let cache = MemoryCache::new(2);

        cache.set("a", b"1", None).await.unwrap();
        cache.set("b", b"2", None).await.unwrap();
        // Touch "a" so "b" becomes least recently used.
        cache.get("a").await.unwrap();
        cache.set("c", b"3", None).await.unwrap();

        assert!(cache.get("a").await.unwrap().is_some());
        assert!(cache.get("b").await.unwrap().is_none());
        assert!(cache.get("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_capacity_still_holds_one_entry() {
        let cache = MemoryCache::new(0);

        cache.set("only", b"1", None).await.unwrap();

        assert!(cache.get("only").await.unwrap().is_some());
    }
}
