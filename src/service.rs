//! Write-Through Service
//!
//! Coordinates the LRU cache and the durable store for create, read and
//! delete. The store always goes first on writes; the cache only follows a
//! confirmed store result, so it never holds a value the store lacks.

use tracing::{debug, warn};

use crate::cache::{CacheStats, LruCache};
use crate::config::Config;
use crate::store::{Connector, DeleteOutcome, ReadOutcome, SqliteConnector, StoreAdapter};

/// Cache key for a store key.
pub fn cache_key(key: i64) -> String {
    key.to_string()
}

// == KV Service ==
/// Write-through cache in front of a [`StoreAdapter`].
///
/// The cache lock and store I/O are never held together: every cache call
/// completes before or after a store call, never around one.
pub struct KvService<K: Connector> {
    cache: LruCache,
    store: StoreAdapter<K>,
}

impl KvService<SqliteConnector> {
    /// Builds the SQLite-backed service described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let connector = SqliteConnector::new(&config.database_path, config.busy_timeout());
        let store = StoreAdapter::new(connector, config.workers, config.ping_interval());
        Self::new(LruCache::new(config.cache_capacity), store)
    }
}

impl<K: Connector> KvService<K> {
    pub fn new(cache: LruCache, store: StoreAdapter<K>) -> Self {
        Self { cache, store }
    }

    // == Create ==
    /// Writes `key` to the store, then caches it.
    ///
    /// Returns false, leaving the cache untouched, if the store write fails.
    pub fn create(&self, key: i64, value: String) -> bool {
        if !self.store.upsert(key, &value) {
            warn!(key, "write rejected by store, cache left unchanged");
            return false;
        }
        self.cache.put(cache_key(key), value);
        true
    }

    // == Read ==
    /// Serves `key` from the cache, falling back to the store on a miss.
    ///
    /// A value found in the store is cached before returning. An unreachable
    /// store reads as not found.
    pub fn read(&self, key: i64) -> Option<String> {
        let cache_key = cache_key(key);

        if let Some(value) = self.cache.get(&cache_key) {
            debug!(key, "cache hit");
            return Some(value);
        }

        match self.store.fetch(key) {
            ReadOutcome::Found(value) => {
                debug!(key, "cache miss, populated from store");
                self.cache.put(cache_key, value.clone());
                Some(value)
            }
            ReadOutcome::NotFound => None,
            ReadOutcome::Unavailable => {
                warn!(key, "store unavailable on read, reporting not found");
                None
            }
        }
    }

    // == Delete ==
    /// Deletes `key` from the store and, only if it existed, from the cache.
    pub fn delete(&self, key: i64) -> bool {
        self.remove(key).is_deleted()
    }

    /// Like [`delete`](Self::delete), reporting an unreachable store apart
    /// from an absent key. The cache is only touched on `Deleted`.
    pub fn remove(&self, key: i64) -> DeleteOutcome {
        let outcome = self.store.remove(key);
        match outcome {
            DeleteOutcome::Deleted => self.cache.remove(&cache_key(key)),
            DeleteOutcome::NotFound => {}
            DeleteOutcome::Unavailable => {
                warn!(key, "store unavailable on delete, cache left unchanged");
            }
        }
        outcome
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &LruCache {
        &self.cache
    }

    pub fn store(&self) -> &StoreAdapter<K> {
        &self.store
    }
}
