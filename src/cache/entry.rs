//! Cache Entry Module
//!
//! Defines the arena node that holds one cached key/value pair together with
//! its links in the recency list.

// == Slot Id ==
/// Stable handle to a node inside the recency arena.
///
/// A slot id stays valid until the entry it points to is evicted; after that
/// the slot may be recycled for a different key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub(crate) u32);

impl SlotId {
    /// Returns the raw arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// == Cache Entry ==
/// A single cache entry: key, value and its neighbours in recency order.
///
/// `prev` points towards the most recently used end, `next` towards the
/// least recently used end.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The key this entry is indexed under
    pub key: String,
    /// The cached value
    pub value: V,
    pub(crate) prev: Option<SlotId>,
    pub(crate) next: Option<SlotId>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a detached entry (no neighbours yet).
    pub fn new(key: String, value: V) -> Self {
        Self {
            key,
            value,
            prev: None,
            next: None,
        }
    }
}
