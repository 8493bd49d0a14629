//! LFU (Least Frequently Used) eviction policy

use std::collections::HashMap;
use std::hash::Hash;

use super::slots::{SlotId, SlotList, Slots};
use crate::core::CacheEntry;

/// LFU policy - evicts the least frequently used entry
///
/// Entries are grouped into one [`SlotList`] per access frequency, most
/// recently touched at the front of each bucket. `min_frequency` points at the
/// lowest non-empty bucket; its tail is the eviction victim, which breaks
/// frequency ties by recency.
#[derive(Debug)]
pub struct LfuPolicy<K, V> {
    capacity: usize,
    index: HashMap<K, SlotId>,
    slots: Slots<CacheEntry<K, V>>,
    buckets: HashMap<u64, SlotList>,
    min_frequency: u64,
}

impl<K: Hash + Eq + Clone, V: Clone> LfuPolicy<K, V> {
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
            buckets: HashMap::new(),
            min_frequency: 0,
        }
    }

    /// Return the value for `key` and bump its frequency
    pub fn lookup(&mut self, key: &K) -> Option<V> {
        let id = *self.index.get(key)?;
        self.touch(id);
        self.slots.get(id).map(|entry| entry.value.clone())
    }

    /// Insert or update `key`, returning the entry evicted to make room
    ///
    /// Updating an existing key counts as an access. A new key always enters
    /// at frequency 1 and resets `min_frequency` to 1.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.slots.get_mut(id) {
                entry.value = value;
            }
            self.touch(id);
            return None;
        }

        let evicted = if self.index.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let id = self.slots.alloc(CacheEntry::new(key.clone(), value, 1));
        self.buckets
            .entry(1)
            .or_default()
            .push_front(&mut self.slots, id);
        self.index.insert(key, id);
        self.min_frequency = 1;

        evicted
    }

    /// Move an entry from its bucket to the head of the next one
    fn touch(&mut self, id: SlotId) {
        let Some(freq) = self.slots.get(id).map(|entry| entry.frequency) else {
            return;
        };

        if let Some(bucket) = self.buckets.get_mut(&freq) {
            bucket.unlink(&mut self.slots, id);
            if bucket.is_empty() {
                self.buckets.remove(&freq);
                if freq == self.min_frequency {
                    self.min_frequency += 1;
                }
            }
        }

        if let Some(entry) = self.slots.get_mut(id) {
            entry.frequency = freq + 1;
        }
        self.buckets
            .entry(freq + 1)
            .or_default()
            .push_front(&mut self.slots, id);
    }

    /// Remove the least recently touched entry of the lowest bucket
    fn evict(&mut self) -> Option<(K, V)> {
        let bucket = self.buckets.get_mut(&self.min_frequency)?;
        let victim = bucket.back()?;
        bucket.unlink(&mut self.slots, victim);
        if bucket.is_empty() {
            self.buckets.remove(&self.min_frequency);
        }

        let entry = self.slots.free(victim)?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Entries from highest to lowest frequency, most recent first within a bucket
    pub fn entries(&self) -> impl Iterator<Item = &CacheEntry<K, V>> {
        let mut freqs: Vec<u64> = self.buckets.keys().copied().collect();
        freqs.sort_unstable_by(|a, b| b.cmp(a));
        freqs
            .into_iter()
            .filter_map(move |freq| self.buckets.get(&freq))
            .flat_map(move |bucket| bucket.iter(&self.slots))
    }

    /// Current access frequency of `key` without counting an access
    pub fn frequency(&self, key: &K) -> Option<u64> {
        let id = self.index.get(key)?;
        self.slots.get(*id).map(|entry| entry.frequency)
    }

    pub fn min_frequency(&self) -> u64 {
        self.min_frequency
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
