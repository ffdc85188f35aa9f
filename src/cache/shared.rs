//! Shared Cache Handle
//!
//! Cloneable, task-safe handle around a single [`CacheStore`].

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

use crate::cache::{CacheStats, CacheStore};

// == Shared Cache ==
/// Handle to one cache instance shared by ingestion, warm-start and readers.
///
/// Every mutation, including the recency touch done by [`get`](Self::get),
/// takes the write lock for the whole structure. Pure inspection
/// (`peek`, `contains`, `keys`, `stats`) takes the read lock and can run
/// alongside other inspections. One lock around the whole store is enough
/// for a single ingestion writer and many readers.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone + Send + Sync> SharedCache<V> {
    // == Constructor ==
    /// Creates an isolated cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheStore::new(capacity))),
        }
    }

    // == Put ==
    /// Inserts or replaces `key`, evicting the LRU entry when full.
    pub async fn put(&self, key: impl Into<String>, value: V) {
        let mut store = self.inner.write().await;
        if let Some(evicted) = store.put(key.into(), value) {
            trace!(key = %evicted, "evicted least recently used entry");
        }
    }

    // == Get ==
    /// Looks up `key`, marking it most recently used on a hit.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.write().await.get(key)
    }

    // == Inspection ==
    /// Looks up `key` without changing its recency.
    pub async fn peek(&self, key: &str) -> Option<V> {
        self.inner.read().await.peek(key).cloned()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.inner.read().await.contains(key)
    }

    /// Keys from most to least recently used.
    pub async fn keys(&self) -> Vec<String> {
        self.inner.read().await.keys()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.inner.read().await.capacity()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }
}
