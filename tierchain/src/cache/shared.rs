use parking_lot::Mutex;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use super::multilevel::MultiLevelCache;
use super::origin::Origin;
use crate::core::{ChainSnapshot, ChainStats, EvictionPolicy, Result};

/// Thread-safe handle to a [`MultiLevelCache`]
///
/// One lock guards the whole chain and is held for the full duration of each
/// call, so a promotion that touches several tiers is atomic with respect to
/// every other operation. Cloning shares the same chain.
pub struct SharedMultiLevelCache<K, V, O> {
    inner: Arc<Mutex<MultiLevelCache<K, V, O>>>,
}

impl<K, V, O> Clone for SharedMultiLevelCache<K, V, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V, O> From<MultiLevelCache<K, V, O>> for SharedMultiLevelCache<K, V, O> {
    fn from(cache: MultiLevelCache<K, V, O>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }
}

impl<K, V, O> SharedMultiLevelCache<K, V, O>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
    O: Origin<K, V>,
{
    pub fn new(origin: O) -> Self {
        MultiLevelCache::new(origin).into()
    }

    pub fn add_tier(&self, capacity: usize, policy: EvictionPolicy) -> Result<()> {
        self.inner.lock().add_tier(capacity, policy)
    }

    pub fn add_tier_named(&self, capacity: usize, policy: &str) -> Result<()> {
        self.inner.lock().add_tier_named(capacity, policy)
    }

    pub fn remove_tier(&self, level: usize) -> Result<()> {
        self.inner.lock().remove_tier(level)
    }

    /// Origin loads on a full miss run while the lock is held
    pub fn get(&self, key: &K) -> Result<V> {
        self.inner.lock().get(key)
    }

    pub fn put(&self, key: K, value: V) -> Result<()> {
        self.inner.lock().put(key, value)
    }

    pub fn put_at(&self, level: usize, key: K, value: V) -> Result<()> {
        self.inner.lock().put_at(level, key, value)
    }

    pub fn snapshot(&self) -> ChainSnapshot<K, V> {
        self.inner.lock().snapshot()
    }

    pub fn stats(&self) -> ChainStats {
        self.inner.lock().stats()
    }

    pub fn tier_count(&self) -> usize {
        self.inner.lock().tier_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OriginError;
    use std::thread;

    fn origin(key: &u64) -> std::result::Result<u64, OriginError> {
        Ok(key * 2)
    }

    #[test]
    fn test_shared_clone_sees_same_chain() {
        let cache: SharedMultiLevelCache<u64, u64, _> = SharedMultiLevelCache::new(origin);
        let other = cache.clone();

        cache.add_tier(4, EvictionPolicy::Lru).unwrap();
        other.put(1, 100).unwrap();

        assert_eq!(cache.get(&1).unwrap(), 100);
        assert_eq!(other.tier_count(), 1);
    }

    #[test]
    fn test_concurrent_access_keeps_capacity() {
        let cache: SharedMultiLevelCache<u64, u64, _> = SharedMultiLevelCache::new(origin);
        cache.add_tier(8, EvictionPolicy::Lru).unwrap();
        cache.add_tier(16, EvictionPolicy::Lfu).unwrap();

        let handles: Vec<_> = (0..4u64)
            .map(|worker| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for i in 0..500u64 {
                        let key = (i * 7 + worker) % 40;
                        if i % 5 == 0 {
                            cache.put(key, key * 2).unwrap();
                        } else {
                            assert_eq!(cache.get(&key).unwrap(), key * 2);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = cache.snapshot();
        assert!(snapshot.tiers[0].len() <= 8);
        assert!(snapshot.tiers[1].len() <= 16);
        assert_eq!(cache.stats().gets, 1600);
    }
}
