use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::CacheError;

/// Eviction policy enforced by a single cache tier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EvictionPolicy {
    /// Least Recently Used
    Lru,
    /// Least Frequently Used, ties broken by recency
    Lfu,
}

impl EvictionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lru => "LRU",
            Self::Lfu => "LFU",
        }
    }
}

impl fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvictionPolicy {
    type Err = CacheError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "LRU" => Ok(Self::Lru),
            "LFU" => Ok(Self::Lfu),
            _ => Err(CacheError::InvalidPolicy(tag.to_string())),
        }
    }
}

/// Entry owned by a tier's slot arena
#[derive(Debug, Clone)]
pub struct CacheEntry<K, V> {
    pub key: K,
    pub value: V,
    /// Access count; only maintained by LFU tiers
    pub frequency: u64,
}

impl<K, V> CacheEntry<K, V> {
    pub fn new(key: K, value: V, frequency: u64) -> Self {
        Self {
            key,
            value,
            frequency,
        }
    }
}

/// Read-only view of one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySnapshot<K, V> {
    pub key: K,
    pub value: V,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<u64>,
}

/// Read-only view of a tier, in eviction-protection order (safest first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSnapshot<K, V> {
    pub policy: EvictionPolicy,
    pub capacity: usize,
    pub entries: Vec<EntrySnapshot<K, V>>,
}

impl<K, V> TierSnapshot<K, V> {
    pub fn keys(&self) -> Vec<&K> {
        self.entries.iter().map(|e| &e.key).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for TierSnapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Cache:", self.policy)?;
        for entry in &self.entries {
            write!(f, "  Key: {}, Value: {}", entry.key, entry.value)?;
            if let Some(freq) = entry.frequency {
                write!(f, ", Frequency: {}", freq)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Read-only view of the whole chain, fastest tier first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainSnapshot<K, V> {
    pub tiers: Vec<TierSnapshot<K, V>>,
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for ChainSnapshot<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tier) in self.tiers.iter().enumerate() {
            writeln!(f, "Level {}:", i + 1)?;
            write!(f, "{}", tier)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Per-tier counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierStats {
    pub hits: u64,
    pub misses: u64,
    /// New keys stored; updates of resident keys are not counted
    pub inserts: u64,
    pub evictions: u64,
}

impl TierStats {
    /// Hit rate as a fraction in [0.0, 1.0]; 0.0 before any lookup
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Chain-wide counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChainStats {
    pub gets: u64,
    pub puts: u64,
    pub promotions: u64,
    pub origin_loads: u64,
    pub origin_failures: u64,
    pub tiers: Vec<TierStats>,
}

impl ChainStats {
    /// Fraction of gets answered without consulting the origin
    pub fn hit_rate(&self) -> f64 {
        if self.gets == 0 {
            return 0.0;
        }
        let misses = self.origin_loads + self.origin_failures;
        self.gets.saturating_sub(misses) as f64 / self.gets as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("LRU".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lru);
        assert_eq!("LFU".parse::<EvictionPolicy>().unwrap(), EvictionPolicy::Lfu);

        // Tags are exact: no case folding, no trimming
        for tag in ["lru", "Lfu", " LRU", "LFU "] {
            assert!(matches!(
                tag.parse::<EvictionPolicy>(),
                Err(CacheError::InvalidPolicy(_))
            ));
        }

        let err = "XYZ".parse::<EvictionPolicy>().unwrap_err();
        assert!(matches!(err, CacheError::InvalidPolicy(tag) if tag == "XYZ"));
    }

    #[test]
    fn test_tier_snapshot_display() {
        let lru = TierSnapshot {
            policy: EvictionPolicy::Lru,
            capacity: 3,
            entries: vec![EntrySnapshot {
                key: "A",
                value: "1",
                frequency: None,
            }],
        };
        assert_eq!(lru.to_string(), "LRU Cache:\n  Key: A, Value: 1\n");

        let lfu = TierSnapshot {
            policy: EvictionPolicy::Lfu,
            capacity: 2,
            entries: vec![EntrySnapshot {
                key: "C",
                value: "3",
                frequency: Some(2),
            }],
        };
        assert_eq!(lfu.to_string(), "LFU Cache:\n  Key: C, Value: 3, Frequency: 2\n");
    }

    #[test]
    fn test_stats_hit_rate() {
        let stats = TierStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert_eq!(stats.hit_rate(), 0.75);
        assert_eq!(TierStats::default().hit_rate(), 0.0);

        let chain = ChainStats {
            gets: 4,
            origin_loads: 1,
            ..Default::default()
        };
        assert_eq!(chain.hit_rate(), 0.75);
    }
}
