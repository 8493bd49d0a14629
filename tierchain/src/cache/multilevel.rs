//! Multi-Level Cache
//!
//! An ordered chain of [`CacheTier`]s in front of an [`Origin`]:
//! - reads scan tiers fastest first and copy a hit into every faster tier
//! - a full miss loads from the origin and stores the value in tier 0 only
//! - writes land in tier 0 only; slower tiers keep whatever copy they had
//!
//! Tiers can be appended or removed between operations.

use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, info, warn};

use super::origin::Origin;
use super::tier::CacheTier;
use crate::core::{CacheError, ChainSnapshot, ChainStats, EvictionPolicy, Result};

/// Chain of cache tiers backed by an origin
///
/// Not synchronized: every operation, reads included, needs `&mut self`.
/// Wrap it in [`SharedMultiLevelCache`](super::SharedMultiLevelCache) to share
/// it between threads.
#[derive(Debug)]
pub struct MultiLevelCache<K, V, O> {
    tiers: Vec<CacheTier<K, V>>,
    origin: O,
    stats: ChainStats,
}

impl<K, V, O> MultiLevelCache<K, V, O>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
    O: Origin<K, V>,
{
    /// Create an empty chain; add at least one tier before reading or writing
    pub fn new(origin: O) -> Self {
        Self {
            tiers: Vec::new(),
            origin,
            stats: ChainStats::default(),
        }
    }

    /// Append a tier behind the current slowest one
    pub fn add_tier(&mut self, capacity: usize, policy: EvictionPolicy) -> Result<()> {
        let tier = CacheTier::new(capacity, policy)?;
        self.tiers.push(tier);
        info!(
            "Added L{} cache tier ({}, capacity {})",
            self.tiers.len(),
            policy,
            capacity
        );
        Ok(())
    }

    /// Append a tier whose policy is given by tag (`"LRU"` or `"LFU"`)
    pub fn add_tier_named(&mut self, capacity: usize, policy: &str) -> Result<()> {
        let policy: EvictionPolicy = policy.parse()?;
        self.add_tier(capacity, policy)
    }

    /// Drop the tier at 1-based `level` together with its entries
    pub fn remove_tier(&mut self, level: usize) -> Result<()> {
        let len = self.tiers.len();
        if level == 0 || level > len {
            return Err(CacheError::InvalidTierIndex { index: level, len });
        }

        let removed = self.tiers.remove(level - 1);
        info!(
            "Removed L{} cache tier ({}, {} entries dropped)",
            level,
            removed.policy(),
            removed.len()
        );
        Ok(())
    }

    /// Read `key`, promoting a hit into faster tiers or loading it from the origin
    pub fn get(&mut self, key: &K) -> Result<V> {
        if self.tiers.is_empty() {
            return Err(CacheError::EmptyChain);
        }
        self.stats.gets += 1;

        let hit = self
            .tiers
            .iter_mut()
            .enumerate()
            .find_map(|(level, tier)| tier.get(key).map(|value| (level, value)));

        if let Some((level, value)) = hit {
            if level > 0 {
                for tier in self.tiers[..level].iter_mut().rev() {
                    tier.put(key.clone(), value.clone());
                }
                self.stats.promotions += 1;
                debug!("Promoted {:?} from L{} to L1", key, level + 1);
            }
            return Ok(value);
        }

        let value = match self.origin.load(key) {
            Ok(value) => value,
            Err(err) => {
                self.stats.origin_failures += 1;
                warn!("Origin load failed for {:?}: {}", key, err);
                return Err(err.into());
            }
        };
        self.stats.origin_loads += 1;
        debug!("Loaded {:?} from origin into L1", key);

        if let Some(first) = self.tiers.first_mut() {
            first.put(key.clone(), value.clone());
        }
        Ok(value)
    }

    /// Write `key` into the fastest tier only
    pub fn put(&mut self, key: K, value: V) -> Result<()> {
        let first = self.tiers.first_mut().ok_or(CacheError::EmptyChain)?;
        first.put(key, value);
        self.stats.puts += 1;
        Ok(())
    }

    /// Write `key` into the tier at 1-based `level` only, e.g. to warm a slower tier
    pub fn put_at(&mut self, level: usize, key: K, value: V) -> Result<()> {
        let len = self.tiers.len();
        let tier = level
            .checked_sub(1)
            .and_then(|index| self.tiers.get_mut(index))
            .ok_or(CacheError::InvalidTierIndex { index: level, len })?;
        tier.put(key, value);
        self.stats.puts += 1;
        Ok(())
    }
}

impl<K, V, O> MultiLevelCache<K, V, O>
where
    K: Hash + Eq + Clone + Debug,
    V: Clone,
{
    /// Per-tier view of the current contents, fastest tier first
    pub fn snapshot(&self) -> ChainSnapshot<K, V> {
        ChainSnapshot {
            tiers: self.tiers.iter().map(CacheTier::snapshot).collect(),
        }
    }

    /// Tier at 1-based `level`, for read-only inspection
    pub fn tier(&self, level: usize) -> Option<&CacheTier<K, V>> {
        level.checked_sub(1).and_then(|index| self.tiers.get(index))
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            tiers: self.tiers.iter().map(CacheTier::stats).collect(),
            ..self.stats.clone()
        }
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn origin(&self) -> &O {
        &self.origin
    }
}
