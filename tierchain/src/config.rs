use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::fs;
use std::hash::Hash;
use std::path::Path;

use crate::cache::{ConstantOrigin, MultiLevelCache, Origin};
use crate::core::{CacheError, Result};

/// Cache chain configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub tiers: Vec<TierConfig>,
    #[serde(default)]
    pub origin: OriginConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierConfig {
    pub capacity: usize,
    /// Policy tag, `LRU` or `LFU`
    pub policy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginConfig {
    /// Value served for every key that misses all tiers
    pub fallback_value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            fallback_value: "Value from main memory".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                TierConfig {
                    capacity: 3,
                    policy: "LRU".to_string(),
                },
                TierConfig {
                    capacity: 2,
                    policy: "LFU".to_string(),
                },
            ],
            origin: OriginConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ChainConfig {
    /// Load configuration from YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: ChainConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Check the chain shape before any tier is built
    pub fn validate(&self) -> Result<()> {
        if self.tiers.is_empty() {
            return Err(CacheError::Config("at least one tier is required".to_string()));
        }
        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.capacity == 0 {
                return Err(CacheError::Config(format!(
                    "tier {} must have a positive capacity",
                    i + 1
                )));
            }
        }
        Ok(())
    }

    /// Build a chain with the configured tiers in front of `origin`
    pub fn build<K, V, O>(&self, origin: O) -> Result<MultiLevelCache<K, V, O>>
    where
        K: Hash + Eq + Clone + Debug,
        V: Clone,
        O: Origin<K, V>,
    {
        self.validate()?;
        let mut cache = MultiLevelCache::new(origin);
        for tier in &self.tiers {
            cache.add_tier_named(tier.capacity, &tier.policy)?;
        }
        Ok(cache)
    }

    /// Origin answering misses with the configured fallback value
    pub fn constant_origin(&self) -> ConstantOrigin<String> {
        ConstantOrigin::new(self.origin.fallback_value.clone())
    }
}
