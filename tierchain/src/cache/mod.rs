//! Cache Module
//!
//! Provides the building blocks of a tiered cache:
//! - Eviction policies: LRU and LFU over a shared slot arena
//! - Tiers: one capacity-bounded policy each
//! - Multi-level chain: promotion on hit, origin fallback, dynamic topology

pub mod lfu;
pub mod lru;
pub mod multilevel;
pub mod origin;
pub mod shared;
mod slots;
pub mod tier;

pub use lfu::LfuPolicy;
pub use lru::LruPolicy;
pub use multilevel::MultiLevelCache;
pub use origin::{ConstantOrigin, Origin};
pub use shared::SharedMultiLevelCache;
pub use tier::CacheTier;
