use thiserror::Error;

/// Main error type for tierchain operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Invalid eviction policy: {0}")]
    InvalidPolicy(String),

    #[error("Invalid tier index {index} (chain has {len} tiers)")]
    InvalidTierIndex { index: usize, len: usize },

    #[error("Invalid tier capacity: {0}")]
    InvalidCapacity(usize),

    #[error("Cache chain has no tiers")]
    EmptyChain,

    #[error("Origin unavailable: {0}")]
    OriginUnavailable(#[from] OriginError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Failure reported by an [`Origin`](crate::cache::Origin) on a full-chain miss
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct OriginError(pub String);

impl OriginError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Result type alias for tierchain operations
pub type Result<T> = std::result::Result<T, CacheError>;
