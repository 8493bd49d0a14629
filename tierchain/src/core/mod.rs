pub mod error;
pub mod types;

pub use error::{CacheError, OriginError, Result};
pub use types::{
    CacheEntry, ChainSnapshot, ChainStats, EntrySnapshot, EvictionPolicy, TierSnapshot, TierStats,
};
