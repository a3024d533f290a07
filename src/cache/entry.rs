//! Cache Entry Module
//!
//! Defines the key/value pair held by the LRU cache.

// == Cache Entry ==
/// A single cached key/value pair.
///
/// Entries carry no metadata of their own; their only ordering is their
/// position in the recency list that owns them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The cache key (decimal rendering of the store key)
    pub key: String,
    /// The cached value
    pub value: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
