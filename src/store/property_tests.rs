//! Property-Based Tests for the Store Module
//!
//! Uses proptest to check the MemoryStore against the store contract.

use std::collections::HashSet;

use proptest::prelude::*;
use tokio_test::block_on;

use crate::store::{KeyValueStore, MemoryStore};

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

// == Strategies ==
/// Generates valid store keys
fn valid_key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_:]{1,64}"
}

/// Generates arbitrary byte payloads
fn valid_value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

#[derive(Debug, Clone)]
enum StoreOp {
    Set { key: String, value: Vec<u8> },
    Get { key: String },
    Incr { key: String },
}

fn store_op_strategy() -> impl Strategy<Value = StoreOp> {
    prop_oneof![
        (valid_key_strategy(), valid_value_strategy())
            .prop_map(|(key, value)| StoreOp::Set { key, value }),
        valid_key_strategy().prop_map(|key| StoreOp::Get { key }),
        valid_key_strategy().prop_map(|key| StoreOp::Incr { key }),
    ]
}

/// Keeps the first occurrence of each key, preserving order.
fn dedup(keys: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter().filter(|key| seen.insert(key.clone())).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any stored payload reads back byte for byte.
    #[test]
    fn prop_roundtrip_storage(key in valid_key_strategy(), value in valid_value_strategy()) {
        let store = MemoryStore::new(TEST_MAX_ENTRIES);

        let retrieved = block_on(async {
            store.set(&key, value.clone()).await.unwrap();
            store.get(&key).await.unwrap()
        });

        prop_assert_eq!(retrieved, Some(value));
    }

    // Hits and misses match what the caller observed.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(store_op_strategy(), 1..50)) {
        let store = MemoryStore::new(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;

        block_on(async {
            for op in ops {
                match op {
                    StoreOp::Set { key, value } => {
                        store.set(&key, value).await.unwrap();
                    }
                    StoreOp::Get { key } => match store.get(&key).await.unwrap() {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    },
                    StoreOp::Incr { key } => {
                        let _ = store.incr(&key).await;
                    }
                }
            }
        });

        let stats = block_on(store.stats());
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, block_on(store.len()));
    }

    // The store never holds more than its capacity.
    #[test]
    fn prop_capacity_enforcement(ops in prop::collection::vec(store_op_strategy(), 1..200)) {
        let max_entries = 20;
        let store = MemoryStore::new(max_entries);

        for op in ops {
            block_on(async {
                match op {
                    StoreOp::Set { key, value } => {
                        let _ = store.set(&key, value).await;
                    }
                    StoreOp::Get { key } => {
                        let _ = store.get(&key).await;
                    }
                    StoreOp::Incr { key } => {
                        let _ = store.incr(&key).await;
                    }
                }
            });
            let len = block_on(store.len());
            prop_assert!(len <= max_entries, "Store size {} exceeds max {}", len, max_entries);
        }
    }

    // N increments of a fresh key leave it at N.
    #[test]
    fn prop_incr_counts_exactly(key in valid_key_strategy(), n in 1i64..200) {
        let store = MemoryStore::new(TEST_MAX_ENTRIES);

        let last = block_on(async {
            let mut last = 0;
            for _ in 0..n {
                last = store.incr(&key).await.unwrap();
            }
            last
        });

        prop_assert_eq!(last, n);
        prop_assert_eq!(block_on(store.get(&key)).unwrap(), Some(n.to_string().into_bytes()));
    }

    // Filling to capacity then inserting a new key evicts the first key written.
    #[test]
    fn prop_lru_eviction_order(
        initial_keys in prop::collection::vec(valid_key_strategy(), 2..10),
        new_key in valid_key_strategy(),
    ) {
        let unique_keys = dedup(initial_keys);
        prop_assume!(unique_keys.len() >= 2);
        prop_assume!(!unique_keys.contains(&new_key));

        let store = MemoryStore::new(unique_keys.len());

        block_on(async {
            for key in &unique_keys {
                store.set(key, key.clone().into_bytes()).await.unwrap();
            }
            store.set(&new_key, b"new".to_vec()).await.unwrap();
        });

        prop_assert_eq!(block_on(store.len()), unique_keys.len());
        prop_assert_eq!(block_on(store.get(&unique_keys[0])).unwrap(), None);
        prop_assert!(block_on(store.get(&new_key)).unwrap().is_some());
        for key in unique_keys.iter().skip(1) {
            prop_assert!(block_on(store.get(key)).unwrap().is_some(), "Key '{}' should survive", key);
        }
    }

    // Reading the oldest key protects it; the second oldest is evicted instead.
    #[test]
    fn prop_lru_access_tracking(
        keys in prop::collection::vec(valid_key_strategy(), 3..8),
        new_key in valid_key_strategy(),
    ) {
        let unique_keys = dedup(keys);
        prop_assume!(unique_keys.len() >= 3);
        prop_assume!(!unique_keys.contains(&new_key));

        let store = MemoryStore::new(unique_keys.len());

        block_on(async {
            for key in &unique_keys {
                store.set(key, b"value".to_vec()).await.unwrap();
            }
            store.get(&unique_keys[0]).await.unwrap();
            store.set(&new_key, b"new".to_vec()).await.unwrap();
        });

        prop_assert!(block_on(store.get(&unique_keys[0])).unwrap().is_some());
        prop_assert_eq!(block_on(store.get(&unique_keys[1])).unwrap(), None);
    }
}
