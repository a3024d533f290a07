//! LRU Cache Module
//!
//! Main cache engine combining a key index with the recency list, guarded by a
//! single mutex so every operation is atomic with respect to every other.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, RecencyList};

/// State guarded by the cache mutex.
#[derive(Debug)]
struct LruInner {
    /// Key -> slot in `order`
    index: HashMap<String, usize>,
    /// Entries ordered by recency
    order: RecencyList,
    /// Performance statistics
    stats: CacheStats,
}

// == LRU Cache ==
/// Fixed-capacity, thread-safe LRU cache of string keys to string values.
///
/// `put`, `get` and `remove` each take the lock for their whole duration and
/// run in O(1). The cache never fails: a miss is `None`, removing an absent
/// key is a no-op.
#[derive(Debug)]
pub struct LruCache {
    inner: Mutex<LruInner>,
    capacity: usize,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Mutex::new(LruInner {
                index: HashMap::with_capacity(capacity),
                order: RecencyList::with_capacity(capacity),
                stats: CacheStats::new(capacity),
            }),
            capacity,
        }
    }

    // == Put ==
    /// Inserts or overwrites `key`, marking it most recently used.
    ///
    /// When the insert pushes the cache over capacity, the least recently
    /// used entry is evicted.
    pub fn put(&self, key: String, value: String) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if let Some(&slot) = inner.index.get(&key) {
            if let Some(entry) = inner.order.get_mut(slot) {
                entry.value = value;
            }
            inner.order.move_to_front(slot);
            return;
        }

        let slot = inner.order.push_front(CacheEntry::new(key.clone(), value));
        inner.index.insert(key, slot);

        if inner.order.len() > self.capacity {
            if let Some(evicted) = inner.order.pop_back() {
                inner.index.remove(&evicted.key);
                inner.stats.record_eviction();
                debug!(key = %evicted.key, "evicted least recently used entry");
            }
        }
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut guard = self.lock();
        let inner = &mut *guard;

        match inner.index.get(key) {
            Some(&slot) => {
                inner.order.move_to_front(slot);
                inner.stats.record_hit();
                inner.order.get(slot).map(|entry| entry.value.clone())
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Deletes `key` if present.
    pub fn remove(&self, key: &str) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if let Some(slot) = inner.index.remove(key) {
            inner.order.remove(slot);
        }
    }

    // == Contains ==
    /// Checks for `key` without touching its recency or the statistics.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().index.contains_key(key)
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.order.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lock()
            .order
            .iter()
            .map(|(_, entry)| entry.key.clone())
            .collect()
    }

    /// Verifies that the index and the recency list describe the same entries.
    #[cfg(test)]
    pub(crate) fn check_consistency(&self) -> Result<(), String> {
        let inner = self.lock();

        if inner.index.len() != inner.order.len() {
            return Err(format!(
                "index has {} keys but list has {} entries",
                inner.index.len(),
                inner.order.len()
            ));
        }
        if inner.order.len() > self.capacity {
            return Err(format!(
                "{} entries exceed capacity {}",
                inner.order.len(),
                self.capacity
            ));
        }
        for (slot, entry) in inner.order.iter() {
            match inner.index.get(&entry.key) {
                Some(&indexed) if indexed == slot => {}
                other => {
                    return Err(format!(
                        "key '{}' lives in slot {} but index says {:?}",
                        entry.key, slot, other
                    ))
                }
            }
        }
        Ok(())
    }

    /// Acquires the cache lock, recovering the guard if it was poisoned.
    fn lock(&self) -> MutexGuard<'_, LruInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
