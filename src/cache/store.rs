//! Cache Store Module
//!
//! Main cache engine combining a HashMap index with the arena LRU list.

use std::collections::HashMap;

use crate::cache::{CacheStats, LruTracker, SlotId};

/// Upper bound on what `new` reserves up front; larger caches grow on demand.
const PREALLOC_LIMIT: usize = 1024;

// == Cache Store ==
/// Capacity-bounded key/value store with strict LRU eviction.
///
/// Not synchronized; see [`SharedCache`](crate::cache::SharedCache) for the
/// handle used across tasks.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key to arena slot
    index: HashMap<String, SlotId>,
    /// Entries in recency order
    lru: LruTracker<V>,
    stats: CacheStats,
    capacity: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let reserve = capacity.min(PREALLOC_LIMIT);
        Self {
            index: HashMap::with_capacity(reserve),
            lru: LruTracker::with_capacity(reserve),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Put ==
    /// Inserts or replaces the value for `key` and marks it most recently used.
    ///
    /// When `key` is new and the store is full, the least recently used entry
    /// is evicted first. Returns the evicted key, if any.
    pub fn put(&mut self, key: String, value: V) -> Option<String> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.lru.get_mut(id) {
                entry.value = value;
            }
            self.lru.touch(id);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.lru.evict_oldest().map(|entry| {
                self.index.remove(&entry.key);
                self.stats.record_eviction();
                entry.key
            })
        } else {
            None
        };

        let id = self.lru.push_front(key.clone(), value);
        self.index.insert(key, id);
        self.stats.set_total_entries(self.index.len());

        evicted
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&mut self, key: &str) -> Option<V> {
        match self.index.get(key) {
            Some(&id) => {
                self.lru.touch(id);
                self.stats.record_hit();
                self.lru.get(id).map(|entry| entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Peek ==
    /// Returns the value for `key` without touching recency or stats.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let id = self.index.get(key)?;
        self.lru.get(*id).map(|entry| &entry.value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys ordered from most to least recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lru.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Key that would be evicted by the next overflowing insert.
    pub fn next_victim(&self) -> Option<&str> {
        self.lru.peek_oldest()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.index.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn store(capacity: usize) -> CacheStore<String> {
        CacheStore::new(capacity)
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_zero_capacity_is_raised() {
        let mut store = store(0);
        assert_eq!(store.capacity(), 1);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("b"), Some("2".to_string()));
    }

    #[test]
    fn test_store_huge_capacity_allocates_lazily() {
        let mut store = store(usize::MAX / 2);
        assert_eq!(store.capacity(), usize::MAX / 2);

        for i in 0..2000 {
            store.put(format!("k{}", i), i.to_string());
        }
        assert_eq!(store.len(), 2000);
        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.get("k0"), Some("0".to_string()));
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = store(100);

        store.put("key1".to_string(), "value1".to_string());

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert_eq!(store.get("nonexistent"), None);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);

        store.put("key1".to_string(), "value1".to_string());
        store.put("key1".to_string(), "value2".to_string());

        assert_eq!(store.get("key1"), Some("value2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = store(2);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        let evicted = store.put("a".to_string(), "3".to_string());

        assert_eq!(evicted, None);
        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        // overwrite also refreshes recency
        assert_eq!(store.next_victim(), Some("b"));
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);

        store.put("key1".to_string(), "value1".to_string());
        store.put("key2".to_string(), "value2".to_string());
        store.put("key3".to_string(), "value3".to_string());

        let evicted = store.put("key4".to_string(), "value4".to_string());

        assert_eq!(evicted, Some("key1".to_string()));
        assert_eq!(store.len(), 3);
        assert!(!store.contains("key1"));
        assert!(store.contains("key2"));
        assert!(store.contains("key3"));
        assert!(store.contains("key4"));
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(2);

        store.put("A".to_string(), "a".to_string());
        store.put("B".to_string(), "b".to_string());
        store.get("A");
        let evicted = store.put("C".to_string(), "c".to_string());

        assert_eq!(evicted, Some("B".to_string()));
        assert!(store.contains("A"));
        assert!(store.contains("C"));
    }

    #[test]
    fn test_store_peek_does_not_touch() {
        let mut store = store(2);

        store.put("A".to_string(), "a".to_string());
        store.put("B".to_string(), "b".to_string());
        assert_eq!(store.peek("A"), Some(&"a".to_string()));

        let evicted = store.put("C".to_string(), "c".to_string());
        assert_eq!(evicted, Some("A".to_string()));

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_store_keys_in_recency_order() {
        let mut store = store(3);

        store.put("a".to_string(), "1".to_string());
        store.put("b".to_string(), "2".to_string());
        store.put("c".to_string(), "3".to_string());
        store.get("a");

        assert_eq!(store.keys(), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(1);

        store.put("key1".to_string(), "value1".to_string());
        store.get("key1");
        store.get("nonexistent");
        store.put("key2".to_string(), "value2".to_string());

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.capacity, 1);
    }
}
