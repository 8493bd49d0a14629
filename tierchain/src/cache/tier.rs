use std::fmt::Debug;
use std::hash::Hash;
use tracing::debug;

use super::lfu::LfuPolicy;
use super::lru::LruPolicy;
use crate::core::{
    CacheEntry, CacheError, EntrySnapshot, EvictionPolicy, Result, TierSnapshot, TierStats,
};

/// Closed set of eviction policies a tier can run
#[derive(Debug)]
enum Policy<K, V> {
    Lru(LruPolicy<K, V>),
    Lfu(LfuPolicy<K, V>),
}

/// One capacity-bounded stage of the chain
#[derive(Debug)]
pub struct CacheTier<K, V> {
    policy: Policy<K, V>,
    stats: TierStats,
}

impl<K, V> CacheTier<K, V>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    /// Create an empty tier
    pub fn new(capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        let policy = match policy {
            EvictionPolicy::Lru => Policy::Lru(LruPolicy::new(capacity)),
            EvictionPolicy::Lfu => Policy::Lfu(LfuPolicy::new(capacity)),
        };

        Ok(Self {
            policy,
            stats: TierStats::default(),
        })
    }

    /// Look up `key`; a hit counts as an access for the policy
    pub fn get(&mut self, key: &K) -> Option<V> {
        let result = match &mut self.policy {
            Policy::Lru(lru) => lru.lookup(key),
            Policy::Lfu(lfu) => lfu.lookup(key),
        };

        if result.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        result
    }

    /// Insert or update `key`, returning the entry evicted to make room
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        let before = self.len();
        let evicted = match &mut self.policy {
            Policy::Lru(lru) => lru.insert(key, value),
            Policy::Lfu(lfu) => lfu.insert(key, value),
        };

        // A new key either grows the tier or displaces a victim
        if evicted.is_some() || self.len() > before {
            self.stats.inserts += 1;
        }
        if let Some((victim, _)) = &evicted {
            self.stats.evictions += 1;
            debug!("{} tier EVICT: {:?}", self.policy(), victim);
        }
        evicted
    }

    /// Ordered view of the tier's contents; does not count as an access
    pub fn snapshot(&self) -> TierSnapshot<K, V> {
        let entries = match &self.policy {
            Policy::Lru(lru) => lru
                .entries()
                .map(|entry| Self::entry_snapshot(entry, None))
                .collect(),
            Policy::Lfu(lfu) => lfu
                .entries()
                .map(|entry| Self::entry_snapshot(entry, Some(entry.frequency)))
                .collect(),
        };

        TierSnapshot {
            policy: self.policy(),
            capacity: self.capacity(),
            entries,
        }
    }

    fn entry_snapshot(entry: &CacheEntry<K, V>, frequency: Option<u64>) -> EntrySnapshot<K, V> {
        EntrySnapshot {
            key: entry.key.clone(),
            value: entry.value.clone(),
            frequency,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        match self.policy {
            Policy::Lru(_) => EvictionPolicy::Lru,
            Policy::Lfu(_) => EvictionPolicy::Lfu,
        }
    }

    pub fn capacity(&self) -> usize {
        match &self.policy {
            Policy::Lru(lru) => lru.capacity(),
            Policy::Lfu(lfu) => lfu.capacity(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.policy {
            Policy::Lru(lru) => lru.len(),
            Policy::Lfu(lfu) => lfu.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> TierStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_rejects_zero_capacity() {
        let err = CacheTier::<String, String>::new(0, EvictionPolicy::Lru).unwrap_err();
        assert!(matches!(err, CacheError::InvalidCapacity(0)));
    }

    #[test]
    fn test_tier_put_get_stats() {
        let mut tier = CacheTier::new(2, EvictionPolicy::Lru).unwrap();

        tier.put("key1", vec![1, 2, 3]);
        assert_eq!(tier.get(&"key1"), Some(vec![1, 2, 3]));
        assert_eq!(tier.get(&"nonexistent"), None);

        let stats = tier.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.inserts, 1);
        assert_eq!(stats.evictions, 0);
    }

    #[test]
    fn test_tier_eviction_counted() {
        let mut tier = CacheTier::new(1, EvictionPolicy::Lfu).unwrap();
        tier.put("a", 1);
        assert_eq!(tier.put("b", 2), Some(("a", 1)));
        assert_eq!(tier.stats().evictions, 1);
        assert_eq!(tier.len(), 1);
    }

    #[test]
    fn test_updates_are_not_counted_as_inserts() {
        for policy in [EvictionPolicy::Lru, EvictionPolicy::Lfu] {
            let mut tier = CacheTier::new(2, policy).unwrap();
            tier.put("a", 1);
            tier.put("a", 2);
            tier.put("b", 3);
            tier.put("b", 4);
            assert_eq!(tier.stats().inserts, 2);

            // Eviction path still counts the new key
            tier.put("c", 5);
            let stats = tier.stats();
            assert_eq!(stats.inserts, 3);
            assert_eq!(stats.evictions, 1);
        }
    }

    #[test]
    fn test_empty_value_is_not_a_miss() {
        let mut tier = CacheTier::new(2, EvictionPolicy::Lru).unwrap();
        tier.put("blank", String::new());

        assert_eq!(tier.get(&"blank"), Some(String::new()));
        assert_eq!(tier.get(&"absent"), None);
    }

    #[test]
    fn test_snapshot_does_not_mutate() {
        let mut tier = CacheTier::new(2, EvictionPolicy::Lfu).unwrap();
        tier.put("a", 1);
        tier.put("b", 2);
        tier.get(&"a");

        let before = tier.snapshot();
        let again = tier.snapshot();
        assert_eq!(before, again);
        assert_eq!(tier.stats().hits, 1);

        assert_eq!(before.policy, EvictionPolicy::Lfu);
        assert_eq!(before.capacity, 2);
        assert_eq!(before.keys(), vec![&"a", &"b"]);
        assert_eq!(before.entries[0].frequency, Some(2));
        assert_eq!(before.entries[1].frequency, Some(1));
    }

    #[test]
    fn test_lru_snapshot_has_no_frequency() {
        let mut tier = CacheTier::new(3, EvictionPolicy::Lru).unwrap();
        tier.put("a", 1);
        tier.put("b", 2);

        let snapshot = tier.snapshot();
        assert_eq!(snapshot.keys(), vec![&"b", &"a"]);
        assert!(snapshot.entries.iter().all(|e| e.frequency.is_none()));
    }
}
