//! LRU Tracker Module
//!
//! Arena-backed doubly linked list that keeps cache entries in recency order.

use crate::cache::entry::{CacheEntry, SlotId};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Entries live in a slab of slots and link to each other through `SlotId`
/// indices instead of pointers:
/// - Head = Most recently used
/// - Tail = Least recently used
///
/// Push, move-to-front and pop-back are all O(1). Vacated slots go on a free
/// list and are reused by later pushes.
#[derive(Debug)]
pub struct LruTracker<V> {
    slots: Vec<Option<CacheEntry<V>>>,
    free: Vec<u32>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<V> Default for LruTracker<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> LruTracker<V> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates a tracker with room for `capacity` entries before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::new()
        }
    }

    // == Push Front ==
    /// Inserts a new entry as the most recently used one.
    pub fn push_front(&mut self, key: String, value: V) -> SlotId {
        let id = self.alloc(CacheEntry::new(key, value));

        if let Some(old_head) = self.head {
            self.node_mut(old_head).prev = Some(id);
            self.node_mut(id).next = Some(old_head);
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    // == Touch ==
    /// Marks an entry as recently used (moves it to the head).
    pub fn touch(&mut self, id: SlotId) {
        if self.head == Some(id) {
            return;
        }
        self.unlink(id);

        let old_head = self.head;
        {
            let node = self.node_mut(id);
            node.prev = None;
            node.next = old_head;
        }
        if let Some(old_head) = old_head {
            self.node_mut(old_head).prev = Some(id);
        }
        self.head = Some(id);
        if self.tail.is_none() {
            self.tail = Some(id);
        }
    }

    // == Evict Oldest ==
    /// Removes and returns the least recently used entry.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<CacheEntry<V>> {
        let tail = self.tail?;
        self.unlink(tail);
        self.len -= 1;
        self.free.push(tail.0);
        self.slots[tail.index()].take()
    }

    // == Peek Oldest ==
    /// Returns the key of the least recently used entry without removing it.
    pub fn peek_oldest(&self) -> Option<&str> {
        self.tail.and_then(|id| self.get(id)).map(|e| e.key.as_str())
    }

    // == Accessors ==
    /// Returns the entry stored in `id`, if the slot is occupied.
    pub fn get(&self, id: SlotId) -> Option<&CacheEntry<V>> {
        self.slots.get(id.index())?.as_ref()
    }

    /// Mutable access to the entry stored in `id`.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut CacheEntry<V>> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Returns the number of tracked entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            tracker: self,
            cursor: self.head,
        }
    }

    // -- Internal helpers --

    fn alloc(&mut self, entry: CacheEntry<V>) -> SlotId {
        if let Some(free) = self.free.pop() {
            self.slots[free as usize] = Some(entry);
            SlotId(free)
        } else {
            let id = SlotId(self.slots.len() as u32);
            self.slots.push(Some(entry));
            id
        }
    }

    /// Detaches `id` from its neighbours, fixing up head and tail.
    fn unlink(&mut self, id: SlotId) {
        let (prev, next) = {
            let node = self.node_mut(id);
            let links = (node.prev, node.next);
            node.prev = None;
            node.next = None;
            links
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    fn node_mut(&mut self, id: SlotId) -> &mut CacheEntry<V> {
        match self.slots[id.index()].as_mut() {
            Some(node) => node,
            None => unreachable!("linked slot {} is vacant", id.index()),
        }
    }
}

// == Iterator ==
/// Iterator over entries in recency order (MRU first).
pub struct Iter<'a, V> {
    tracker: &'a LruTracker<V>,
    cursor: Option<SlotId>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a CacheEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.tracker.get(self.cursor?)?;
        self.cursor = entry.next;
        Some(entry)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(lru: &LruTracker<u32>) -> Vec<String> {
        lru.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn test_lru_new() {
        let lru: LruTracker<u32> = LruTracker::new();
        assert!(lru.is_empty());
        assert_eq!(lru.len(), 0);
        assert_eq!(lru.peek_oldest(), None);
    }

    #[test]
    fn test_lru_push_front_orders_by_insertion() {
        let mut lru = LruTracker::new();

        lru.push_front("key1".to_string(), 1);
        lru.push_front("key2".to_string(), 2);
        lru.push_front("key3".to_string(), 3);

        assert_eq!(lru.len(), 3);
        assert_eq!(keys(&lru), vec!["key3", "key2", "key1"]);
        assert_eq!(lru.peek_oldest(), Some("key1"));
    }

    #[test]
    fn test_lru_touch_moves_to_front() {
        let mut lru = LruTracker::new();

        let a = lru.push_front("a".to_string(), 1);
        lru.push_front("b".to_string(), 2);
        lru.push_front("c".to_string(), 3);

        lru.touch(a);

        assert_eq!(keys(&lru), vec!["a", "c", "b"]);
        assert_eq!(lru.peek_oldest(), Some("b"));
    }

    #[test]
    fn test_lru_touch_middle_and_head() {
        let mut lru = LruTracker::new();

        lru.push_front("a".to_string(), 1);
        let b = lru.push_front("b".to_string(), 2);
        let c = lru.push_front("c".to_string(), 3);

        // head touch is a no-op
        lru.touch(c);
        assert_eq!(keys(&lru), vec!["c", "b", "a"]);

        lru.touch(b);
        assert_eq!(keys(&lru), vec!["b", "c", "a"]);
        assert_eq!(lru.len(), 3);
    }

    #[test]
    fn test_lru_touch_single_entry() {
        let mut lru = LruTracker::new();
        let a = lru.push_front("a".to_string(), 1);

        lru.touch(a);

        assert_eq!(keys(&lru), vec!["a"]);
        assert_eq!(lru.peek_oldest(), Some("a"));
    }

    #[test]
    fn test_lru_evict_oldest() {
        let mut lru = LruTracker::new();

        lru.push_front("key1".to_string(), 1);
        lru.push_front("key2".to_string(), 2);
        lru.push_front("key3".to_string(), 3);

        let evicted = lru.evict_oldest().unwrap();
        assert_eq!(evicted.key, "key1");
        assert_eq!(evicted.value, 1);
        assert_eq!(lru.len(), 2);

        let evicted = lru.evict_oldest().unwrap();
        assert_eq!(evicted.key, "key2");
        assert_eq!(lru.len(), 1);

        let evicted = lru.evict_oldest().unwrap();
        assert_eq!(evicted.key, "key3");
        assert!(lru.is_empty());
        assert!(lru.evict_oldest().is_none());
    }

    #[test]
    fn test_lru_slots_are_recycled() {
        let mut lru = LruTracker::with_capacity(2);

        let first = lru.push_front("a".to_string(), 1);
        lru.push_front("b".to_string(), 2);
        lru.evict_oldest();

        let reused = lru.push_front("c".to_string(), 3);
        assert_eq!(reused, first);
        assert_eq!(lru.get(reused).unwrap().key, "c");
        assert_eq!(keys(&lru), vec!["c", "b"]);
    }

    #[test]
    fn test_lru_order_after_multiple_touches() {
        let mut lru = LruTracker::new();

        let a = lru.push_front("a".to_string(), 1);
        let b = lru.push_front("b".to_string(), 2);
        let c = lru.push_front("c".to_string(), 3);

        lru.touch(a);
        lru.touch(c);
        lru.touch(b);

        assert_eq!(lru.evict_oldest().unwrap().key, "a");
        assert_eq!(lru.evict_oldest().unwrap().key, "c");
        assert_eq!(lru.evict_oldest().unwrap().key, "b");
    }

    #[test]
    fn test_lru_get_mut_updates_value() {
        let mut lru = LruTracker::new();
        let a = lru.push_front("a".to_string(), 1);

        lru.get_mut(a).unwrap().value = 10;

        assert_eq!(lru.get(a).unwrap().value, 10);
    }
}
