//! Cache Module
//!
//! Provides the bounded in-memory LRU cache that fronts the durable store.

mod entry;
mod lru;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyList;
pub use stats::CacheStats;
pub use store::LruCache;

// == Public Constants ==
/// Cache capacity used when none is configured
pub const DEFAULT_CAPACITY: usize = 100;
