//! TTL cache and the cache interface services are handed.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Key-value cache injected into services that memoize results.
///
/// Services only ever read and write through this trait, so tests can pass
/// a cache with deterministic behavior.
pub trait CacheStore<V>: Send + Sync {
    /// Look up a live value.
    fn get(&self, key: &str) -> Option<V>;

    /// Store a value under `key`.
    fn put(&self, key: String, value: V);

    /// Number of entries currently held.
    fn entry_count(&self) -> usize;
}

/// Cache that never holds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl<V> CacheStore<V> for NoCache {
    fn get(&self, _key: &str) -> Option<V> {
        None
    }

    fn put(&self, _key: String, _value: V) {}

    fn entry_count(&self) -> usize {
        0
    }
}

/// A thread-safe cache with TTL support.
///
/// Expired entries are dropped on read and swept on every write, so the map
/// never outgrows the set of keys written within one TTL.
pub struct Cache<V> {
    data: DashMap<String, CacheEntry<V>>,
    default_ttl: Duration,
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> Cache<V> {
    /// Create a new cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            default_ttl,
        }
    }

    /// Get a value from the cache.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.data.get(key)?;
        if entry.expires_at > Instant::now() {
            Some(entry.value.clone())
        } else {
            drop(entry);
            self.data.remove(key);
            None
        }
    }

    /// Set a value in the cache with the default TTL.
    pub fn set(&self, key: String, value: V) {
        self.data.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.default_ttl,
            },
        );
    }

    /// Remove all expired entries from the cache.
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Get the number of entries in the cache (including expired).
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }
}

impl<V: Clone + Send + Sync> CacheStore<V> for Cache<V> {
    fn get(&self, key: &str) -> Option<V> {
        Cache::get(self, key)
    }

    fn put(&self, key: String, value: V) {
        self.cleanup();
        self.set(key, value);
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_store_trait() {
        let cache: Cache<u8> = Cache::new(Duration::from_secs(60));
        let store: &dyn CacheStore<u8> = &cache;
        store.put("a".to_string(), 1);
        assert_eq!(store.get("a"), Some(1));
        assert_eq!(store.entry_count(), 1);
    }

    #[test]
    fn test_no_cache_forgets() {
        let store: &dyn CacheStore<u8> = &NoCache;
        store.put("a".to_string(), 1);
        assert_eq!(store.get("a"), None);
        assert_eq!(store.entry_count(), 0);
    }

    #[test]
    fn test_cache_basic() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.get("key2"), None);
    }

    #[test]
    fn test_cache_expiration() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.set("key1".to_string(), "value1".to_string());
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("key1"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_cache_cleanup() {
        let cache = Cache::new(Duration::from_millis(10));
        cache.set("key1".to_string(), 1);
        cache.set("key2".to_string(), 2);

        std::thread::sleep(Duration::from_millis(20));
        cache.set("key3".to_string(), 3);
        cache.cleanup();

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key3"), Some(3));
    }

    #[test]
    fn test_put_sweeps_expired_entries() {
        let cache: Cache<usize> = Cache::new(Duration::from_millis(5));
        let store: &dyn CacheStore<usize> = &cache;
        for i in 0..200 {
            store.put(format!("SYM{}", i), i);
        }
        assert_eq!(store.entry_count(), 200);

        std::thread::sleep(Duration::from_millis(20));
        store.put("FRESH".to_string(), 0);

        assert_eq!(store.entry_count(), 1);
        assert_eq!(store.get("FRESH"), Some(0));
    }

    #[test]
    fn test_cache_overwrite() {
        let cache = Cache::new(Duration::from_secs(60));
        cache.set("key".to_string(), "value1".to_string());
        cache.set("key".to_string(), "value2".to_string());

        assert_eq!(cache.get("key"), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
    }
}
