pub mod cache;
pub mod config;
pub mod core;

// Re-export commonly used types
pub use cache::{
    CacheTier, ConstantOrigin, LfuPolicy, LruPolicy, MultiLevelCache, Origin,
    SharedMultiLevelCache,
};
pub use config::{ChainConfig, LoggingConfig, OriginConfig, TierConfig};
pub use crate::core::{
    CacheError, ChainSnapshot, ChainStats, EntrySnapshot, EvictionPolicy, OriginError, Result,
    TierSnapshot, TierStats,
};
