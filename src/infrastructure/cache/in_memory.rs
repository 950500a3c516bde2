//! In-memory cache implementation using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::cache::{Cache, Expiration};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Cache entry stored in moka
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Serialized JSON value
    data: String,
    expiration: Expiration,
}

/// Per-entry expiry: sliding entries get a fresh window on every access
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.expiration.duration())
    }

    fn expire_after_read(
        &self,
        _key: &String,
        value: &CacheEntry,
        _read_at: Instant,
        duration_until_expiry: Option<Duration>,
        _last_modified_at: Instant,
    ) -> Option<Duration> {
        match value.expiration {
            Expiration::Sliding(window) => Some(window),
            Expiration::Absolute(_) => duration_until_expiry,
        }
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.expiration.duration())
    }
}

/// Thread-safe in-memory cache implementation using moka
///
/// Features:
/// - Sliding or absolute expiration per entry
/// - LRU-like eviction when capacity is reached
/// - Internal synchronization, callers add no locking
#[derive(Debug)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
}

impl InMemoryCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { cache }
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.cache.get(key).await.map(|entry| entry.data))
    }

    async fn set_raw(
        &self,
        key: &str,
        value: &str,
        expiration: Expiration,
    ) -> Result<(), DomainError> {
        let entry = CacheEntry {
            data: value.to_string(),
            expiration,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        // contains_key does not count as an access, so a sliding window is untouched
        Ok(self.cache.contains_key(key))
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::CacheExt;

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Expiration::Sliding(MINUTE))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("value1".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryCache::new();

        let result: Option<String> = cache.get("missing").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"old", Expiration::Sliding(MINUTE))
            .await
            .unwrap();
        cache
            .set("key1", &"new", Expiration::Sliding(MINUTE))
            .await
            .unwrap();

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert_eq!(result, Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Expiration::Sliding(MINUTE))
            .await
            .unwrap();

        let deleted = cache.delete("key1").await.unwrap();
        assert!(deleted);

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing() {
        let cache = InMemoryCache::new();

        let deleted = cache.delete("missing").await.unwrap();
        assert!(!deleted);
    }

    #[tokio::test]
    async fn test_exists() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Expiration::Sliding(MINUTE))
            .await
            .unwrap();

        assert!(cache.exists("key1").await.unwrap());
        assert!(!cache.exists("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_absolute_expiration() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Expiration::Absolute(Duration::from_millis(50)))
            .await
            .unwrap();

        assert!(cache.exists("key1").await.unwrap());

        tokio::time::sleep(Duration::from_millis(150)).await;

        let result: Option<String> = cache.get("key1").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_absolute_expiration_ignores_reads() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Expiration::Absolute(Duration::from_millis(400)))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        let read: Option<String> = cache.get("key1").await.unwrap();
        assert!(read.is_some());

        tokio::time::sleep(Duration::from_millis(250)).await;
        let read: Option<String> = cache.get("key1").await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_sliding_expiration_is_renewed_by_reads() {
        let cache = InMemoryCache::new();
        let window = Duration::from_millis(500);

        cache
            .set("key1", &"value1", Expiration::Sliding(window))
            .await
            .unwrap();

        // Each read lands inside the window and pushes expiry forward
        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(250)).await;
            let read: Option<String> = cache.get("key1").await.unwrap();
            assert_eq!(read.as_deref(), Some("value1"));
        }

        // Idle for longer than the window
        tokio::time::sleep(Duration::from_millis(800)).await;
        let read: Option<String> = cache.get("key1").await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryCache::new();

        cache
            .set("key1", &"value1", Expiration::Sliding(MINUTE))
            .await
            .unwrap();
        cache
            .set("key2", &"value2", Expiration::Sliding(MINUTE))
            .await
            .unwrap();

        assert_eq!(cache.size().await.unwrap(), 2);

        cache.clear().await.unwrap();

        let size = cache.size().await.unwrap();
        assert_eq!(size, 0);
    }

    #[tokio::test]
    async fn test_complex_types() {
        let cache = InMemoryCache::new();

        #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
        struct TestData {
            name: String,
            values: Vec<i32>,
        }

        let data = TestData {
            name: "test".to_string(),
            values: vec![1, 2, 3],
        };

        cache
            .set("complex", &data, Expiration::Sliding(MINUTE))
            .await
            .unwrap();

        let result: Option<TestData> = cache.get("complex").await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_config() {
        let config = InMemoryCacheConfig::default().with_max_capacity(100);
        let cache = InMemoryCache::with_config(config);

        assert_eq!(cache.cache.policy().max_capacity(), Some(100));
    }
}
