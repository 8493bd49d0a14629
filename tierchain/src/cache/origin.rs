use crate::core::OriginError;

/// Source of truth consulted when every tier misses
pub trait Origin<K, V> {
    /// Produce the value for `key`
    fn load(&self, key: &K) -> Result<V, OriginError>;
}

impl<K, V, F> Origin<K, V> for F
where
    F: Fn(&K) -> Result<V, OriginError>,
{
    fn load(&self, key: &K) -> Result<V, OriginError> {
        self(key)
    }
}

/// Origin that answers every key with the same value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantOrigin<V> {
    value: V,
}

impl<V> ConstantOrigin<V> {
    pub fn new(value: V) -> Self {
        Self { value }
    }
}

impl Default for ConstantOrigin<String> {
    fn default() -> Self {
        Self::new("Value from main memory".to_string())
    }
}

impl<K, V: Clone> Origin<K, V> for ConstantOrigin<V> {
    fn load(&self, _key: &K) -> Result<V, OriginError> {
        Ok(self.value.clone())
    }
}
