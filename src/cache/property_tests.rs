//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the cache against a simple reference model.

use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;

use crate::cache::LruCache;

// == Strategies ==
/// Keys drawn from a small space so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    (0i64..24).prop_map(|k| k.to_string())
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,32}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: String },
    Get { key: String },
    Remove { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Remove { key }),
    ]
}

// == Reference Model ==
/// Linear-time LRU used as the oracle: front = most recently used.
struct ModelLru {
    capacity: usize,
    entries: VecDeque<(String, String)>,
}

impl ModelLru {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::new(),
        }
    }

    fn take(&mut self, key: &str) -> Option<(String, String)> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        self.entries.remove(position)
    }

    fn put(&mut self, key: String, value: String) {
        self.take(&key);
        self.entries.push_front((key, value));
        if self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    fn get(&mut self, key: &str) -> Option<String> {
        let entry = self.take(key)?;
        let value = entry.1.clone();
        self.entries.push_front(entry);
        Some(value)
    }

    fn remove(&mut self, key: &str) {
        self.take(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Any sequence of operations leaves the cache in the same state as the
    // reference model, with the same answers along the way.
    #[test]
    fn prop_matches_reference_model(
        capacity in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..120)
    ) {
        let cache = LruCache::new(capacity);
        let mut model = ModelLru::new(capacity);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    cache.put(key.clone(), value.clone());
                    model.put(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key), model.get(&key), "get({}) diverged", key);
                }
                CacheOp::Remove { key } => {
                    cache.remove(&key);
                    model.remove(&key);
                }
            }
            prop_assert_eq!(cache.keys_by_recency(), model.keys());
            prop_assert!(cache.check_consistency().is_ok(), "{:?}", cache.check_consistency());
        }
    }

    // For any sequence of puts the cache never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(
        capacity in 1usize..16,
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..200)
    ) {
        let cache = LruCache::new(capacity);

        for (key, value) in entries {
            cache.put(key, value);
            prop_assert!(
                cache.len() <= capacity,
                "Cache size {} exceeds capacity {}",
                cache.len(),
                capacity
            );
        }
    }

    // Storing a pair and reading it straight back returns the stored value.
    #[test]
    fn prop_put_then_get(key in key_strategy(), value in value_strategy()) {
        let cache = LruCache::new(4);

        cache.put(key.clone(), value.clone());

        prop_assert_eq!(cache.get(&key), Some(value));
    }

    // After remove, get reports a miss and a second remove changes nothing.
    #[test]
    fn prop_remove_is_idempotent(key in key_strategy(), value in value_strategy()) {
        let cache = LruCache::new(4);

        cache.put(key.clone(), value);
        cache.remove(&key);
        prop_assert_eq!(cache.get(&key), None);

        cache.remove(&key);
        prop_assert!(cache.is_empty());
    }

    // Hits and misses are counted exactly, evictions match the model's drops.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let cache = LruCache::new(5);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Put { key, value } => cache.put(key, value),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Remove { key } => cache.remove(&key),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, cache.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Concurrent workers on overlapping keys never leave the index pointing
    // at a stale slot, never exceed capacity, and only ever read values some
    // worker actually wrote for that key.
    #[test]
    fn prop_concurrent_operation_correctness(
        capacity in 1usize..10,
        workloads in prop::collection::vec(
            prop::collection::vec(cache_op_strategy(), 10..60),
            2..6
        )
    ) {
        let cache = Arc::new(LruCache::new(capacity));

        let handles: Vec<_> = workloads
            .into_iter()
            .map(|ops| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for op in ops {
                        match op {
                            CacheOp::Put { key, value } => {
                                cache.put(key.clone(), format!("{}={}", key, value))
                            }
                            CacheOp::Get { key } => {
                                if let Some(value) = cache.get(&key) {
                                    let prefix = format!("{}=", key);
                                    if !value.starts_with(&prefix) {
                                        return Err(format!("torn read for {}: {}", key, value));
                                    }
                                }
                            }
                            CacheOp::Remove { key } => cache.remove(&key),
                        }
                        if cache.len() > cache.capacity() {
                            return Err("capacity exceeded".to_string());
                        }
                    }
                    Ok(())
                })
            })
            .collect();

        for handle in handles {
            let result = handle.join().expect("worker should not panic");
            prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
        }

        prop_assert!(cache.check_consistency().is_ok(), "{:?}", cache.check_consistency());
        prop_assert!(cache.len() <= capacity);
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_agrees_on_documented_eviction() {
        let mut model = ModelLru::new(2);
        model.put("a".into(), "1".into());
        model.put("b".into(), "2".into());
        model.get("a");
        model.put("c".into(), "3".into());

        assert_eq!(model.keys(), vec!["c", "a"]);
    }

    #[test]
    fn test_capacity_one_keeps_latest() {
        let cache = LruCache::new(1);

        for i in 0..10 {
            cache.put(i.to_string(), format!("v{}", i));
        }

        assert_eq!(cache.keys_by_recency(), vec!["9"]);
        assert_eq!(cache.stats().evictions, 9);
    }
}
