//! LRU (Least Recently Used) eviction policy

use std::collections::HashMap;
use std::hash::Hash;

use super::slots::{SlotId, SlotList, Slots};
use crate::core::CacheEntry;

/// LRU policy - evicts the least recently touched entry
///
/// Recency order is a single [`SlotList`] (most recent at the front) and the
/// index maps every resident key to its slot, so lookups, promotions and
/// evictions are all O(1).
#[derive(Debug)]
pub struct LruPolicy<K, V> {
    capacity: usize,
    index: HashMap<K, SlotId>,
    slots: Slots<CacheEntry<K, V>>,
    order: SlotList,
}

impl<K: Hash + Eq + Clone, V: Clone> LruPolicy<K, V> {
    /// Create an empty policy
    ///
    /// A capacity of 0 is clamped to 1 so the policy can always hold the entry
    /// just inserted. [`CacheTier::new`](super::CacheTier::new) rejects 0
    /// instead, with [`CacheError::InvalidCapacity`](crate::CacheError::InvalidCapacity).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Slots::with_capacity(capacity),
            order: SlotList::new(),
        }
    }

    /// Return the value for `key` and mark it most recently used
    pub fn lookup(&mut self, key: &K) -> Option<V> {
        let id = *self.index.get(key)?;
        self.order.move_to_front(&mut self.slots, id);
        self.slots.get(id).map(|entry| entry.value.clone())
    }

    /// Insert or update `key`, returning the entry evicted to make room
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.slots.get_mut(id) {
                entry.value = value;
            }
            self.order.move_to_front(&mut self.slots, id);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.slots.alloc(CacheEntry::new(key.clone(), value, 0));
        self.order.push_front(&mut self.slots, id);
        self.index.insert(key, id);

        evicted
    }

    /// Remove the tail of the recency order
    fn evict(&mut self) -> Option<(K, V)> {
        let victim = self.order.back()?;
        self.order.unlink(&mut self.slots, victim);
        let entry = self.slots.free(victim)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Entries from most to least recently used
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry<K, V>> {
        self.order.iter(&self.slots)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(policy: &LruPolicy<&'static str, i32>) -> Vec<&'static str> {
        policy.entries().map(|e| e.key).collect()
    }

    #[test]
    fn test_lru_put_get() {
        let mut lru = LruPolicy::new(3);
        lru.insert("a", 1);

        assert_eq!(lru.lookup(&"a"), Some(1));
        assert_eq!(lru.lookup(&"missing"), None);
        assert_eq!(lru.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let mut lru = LruPolicy::new(3);
        assert_eq!(lru.insert("a", 1), None);
        assert_eq!(lru.insert("b", 2), None);
        assert_eq!(lru.insert("c", 3), None);

        // Full - a is the oldest
        assert_eq!(lru.insert("d", 4), Some(("a", 1)));
        assert_eq!(lru.lookup(&"a"), None);
        assert_eq!(lru.len(), 3);
    }

    #[test]
    fn test_lru_read_protects_entry() {
        let mut lru = LruPolicy::new(3);
        lru.insert("k1", 1);
        lru.insert("k2", 2);
        lru.insert("k3", 3);

        // Reading k1 makes k2 the least recent
        lru.lookup(&"k1");
        assert_eq!(lru.insert("k4", 4), Some(("k2", 2)));
        assert_eq!(keys(&lru), vec!["k4", "k1", "k3"]);
    }

    #[test]
    fn test_lru_update_moves_to_front() {
        let mut lru = LruPolicy::new(2);
        lru.insert("a", 1);
        lru.insert("b", 2);

        assert_eq!(lru.insert("a", 10), None);
        assert_eq!(keys(&lru), vec!["a", "b"]);
        assert_eq!(lru.insert("c", 3), Some(("b", 2)));
        assert_eq!(lru.lookup(&"a"), Some(10));
    }

    #[test]
    fn test_lru_capacity_one() {
        let mut lru = LruPolicy::new(1);
        lru.insert("a", 1);
        assert_eq!(lru.insert("b", 2), Some(("a", 1)));
        assert_eq!(keys(&lru), vec!["b"]);
    }

    #[test]
    fn test_lru_zero_capacity_clamped() {
        let mut cache = LruPolicy::new(0);
        assert_eq!(cache.capacity(), 1);

        assert_eq!(cache.insert("a", 1), None);
        assert_eq!(cache.insert("b", 2), Some(("a", 1)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_capacity_invariant() {
        let mut lru = LruPolicy::new(4);
        for i in 0..100 {
            let key = ["a", "b", "c", "d", "e", "f", "g"][i % 7];
            if i % 3 == 0 {
                lru.lookup(&key);
            } else {
                lru.insert(key, i as i32);
            }
            assert!(lru.len() <= lru.capacity());
            assert_eq!(lru.entries().count(), lru.len());
        }
    }
}
