//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check capacity, eviction order, key canonicalization and
//! namespace isolation over generated inputs.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::cache::{ApiCache, MemoryCache, PersistentCache};
use crate::store::MemoryStore;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

fn valid_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,64}"
}

fn unique_keys(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(k.clone())).collect()
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: String },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| CacheOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| CacheOp::Get { key }),
        valid_key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // The entry count never exceeds max_size under any operation sequence.
    #[test]
    fn prop_capacity_enforcement(
        max_size in 0usize..20,
        ops in prop::collection::vec(cache_op_strategy(), 1..200)
    ) {
        let mut cache = MemoryCache::new(max_size, TEST_TTL);

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, None),
                CacheOp::Get { key } => { cache.get(&key); }
                CacheOp::Delete { key } => cache.delete(&key),
            }
            prop_assert!(cache.size() <= max_size, "size {} exceeds {}", cache.size(), max_size);
        }
    }

    // Hits and misses match what the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let mut cache = MemoryCache::new(100, TEST_TTL);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => cache.set(key, value, None),
                CacheOp::Get { key } => match cache.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Delete { key } => cache.delete(&key),
            }
        }

        let stats = cache.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, cache.size());
    }

    // Filling N slots and inserting one more evicts exactly the first key,
    // even if every key was read in between.
    #[test]
    fn prop_insertion_order_eviction(
        keys in prop::collection::vec(valid_key_strategy(), 2..12),
        new_key in valid_key_strategy(),
        read_all in any::<bool>()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 2);
        prop_assume!(!keys.contains(&new_key));

        let capacity = keys.len();
        let mut cache = MemoryCache::new(capacity, TEST_TTL);
        for key in &keys {
            cache.set(key.clone(), format!("value_{}", key), None);
        }

        if read_all {
            for key in &keys {
                prop_assert!(cache.get(key).is_some());
            }
        }

        cache.set(new_key.clone(), "new".to_string(), None);

        prop_assert_eq!(cache.size(), capacity);
        prop_assert!(cache.get(&keys[0]).is_none(), "first key should be evicted");
        prop_assert!(cache.get(&new_key).is_some());
        for key in keys.iter().skip(1) {
            prop_assert!(cache.get(key).is_some(), "key '{}' should survive", key);
        }
    }

    // Re-setting the first key moves it behind the others.
    #[test]
    fn prop_reset_moves_key_to_newest(
        keys in prop::collection::vec(valid_key_strategy(), 3..10),
        new_key in valid_key_strategy()
    ) {
        let keys = unique_keys(keys);
        prop_assume!(keys.len() >= 3);
        prop_assume!(!keys.contains(&new_key));

        let mut cache = MemoryCache::new(keys.len(), TEST_TTL);
        for key in &keys {
            cache.set(key.clone(), "v".to_string(), None);
        }
        cache.set(keys[0].clone(), "again".to_string(), None);
        cache.set(new_key, "new".to_string(), None);

        prop_assert_eq!(cache.get(&keys[0]), Some("again".to_string()));
        prop_assert!(cache.get(&keys[1]).is_none());
    }

    // Parameter insertion order never changes the generated key.
    #[test]
    fn prop_key_canonicalization(
        endpoint in "[a-z]{1,10}(/[a-z]{1,10})?",
        params in prop::collection::btree_map("[a-z]{1,8}", 0i64..1000, 0..8)
    ) {
        let forward: Map<String, Value> = params
            .iter()
            .map(|(k, v)| (k.clone(), Value::from(*v)))
            .collect();
        let reversed: Map<String, Value> = params
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), Value::from(*v)))
            .collect();
        let as_btree: BTreeMap<&String, &i64> = params.iter().collect();

        let a = ApiCache::generate_key(&endpoint, &Value::Object(forward));
        let b = ApiCache::generate_key(&endpoint, &Value::Object(reversed));
        let c = ApiCache::generate_key(&endpoint, &as_btree);

        prop_assert_eq!(&a, &b);
        prop_assert_eq!(&a, &c);
        let prefix = format!("{}_", endpoint);
        prop_assert!(a.starts_with(&prefix));
    }

    // Changing any parameter value changes the key.
    #[test]
    fn prop_key_distinguishes_values(
        name in "[a-z]{1,8}",
        a in 0i64..1000,
        b in 0i64..1000
    ) {
        prop_assume!(a != b);
        let mut first = Map::new();
        first.insert(name.clone(), Value::from(a));
        let mut second = Map::new();
        second.insert(name, Value::from(b));

        prop_assert_ne!(
            ApiCache::generate_key("search", &Value::Object(first)),
            ApiCache::generate_key("search", &Value::Object(second))
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // Two namespaces over one store never see each other's values.
    #[test]
    fn prop_namespace_isolation(
        key in valid_key_strategy(),
        left in valid_value_strategy(),
        right in valid_value_strategy()
    ) {
        tokio_test::block_on(async {
            let store = Arc::new(MemoryStore::new());
            let a = PersistentCache::new(store.clone(), "left");
            let b = PersistentCache::new(store.clone(), "right");

            a.set(&key, &left, None).await;
            b.set(&key, &right, None).await;

            prop_assert_eq!(a.get::<String>(&key).await, Some(left.clone()));
            prop_assert_eq!(b.get::<String>(&key).await, Some(right.clone()));

            a.clear().await;

            prop_assert_eq!(a.get::<String>(&key).await, None);
            prop_assert_eq!(b.get::<String>(&key).await, Some(right));
            Ok(())
        })?;
    }
}
