//! Property-Based Tests for Storage Module
//!
//! Uses proptest to check store behavior over generated inputs. The store is
//! async, so each case drives it with `tokio_test::block_on`.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use tokio_test::block_on;

use crate::config::StorageConfig;
use crate::error::StoreError;
use crate::storage::{Object, RequestSettings, Store, DEFAULT_COLLECTION};

// == Test Configuration ==
const TEST_DEFAULT_TTL: u64 = 300;

fn test_store(max_collections_count: usize) -> Store {
    Store::new(StorageConfig {
        default_ttl: TEST_DEFAULT_TTL,
        max_collections_count,
        ..StorageConfig::default()
    })
}

// == Strategies ==
/// Generates object keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}"
}

/// Generates collection names (never the default one)
fn collection_strategy() -> impl Strategy<Value = String> {
    "c_[a-z0-9]{1,12}"
}

/// Generates arbitrary payloads
fn data_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

#[derive(Debug, Clone)]
enum ObjectOp {
    Set { key: String, data: Vec<u8> },
    Get { key: String },
    Delete { key: String },
}

fn object_op_strategy() -> impl Strategy<Value = ObjectOp> {
    // Small key space so operations collide
    let key = "[a-d]";
    prop_oneof![
        (key, data_strategy()).prop_map(|(key, data)| ObjectOp::Set { key, data }),
        key.prop_map(|key| ObjectOp::Get { key }),
        key.prop_map(|key| ObjectOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Set followed by an immediate get returns the stored payload
    #[test]
    fn prop_set_then_get_returns_data(key in key_strategy(), data in data_strategy()) {
        let store = test_store(4);

        let got = block_on(async {
            store.set_object("", &key, RequestSettings::new(data.clone())).await.unwrap();
            store.get_object(DEFAULT_COLLECTION, &key).await
        });

        let got = got.unwrap();
        prop_assert_eq!(got.data(), data.as_slice());
    }

    // Sequential operations behave like a plain map
    #[test]
    fn prop_operations_match_model(ops in prop::collection::vec(object_op_strategy(), 1..60)) {
        let store = test_store(4);
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();

        block_on(async {
            for op in ops {
                match op {
                    ObjectOp::Set { key, data } => {
                        store.set_object("", &key, RequestSettings::new(data.clone())).await.unwrap();
                        model.insert(key, data);
                    }
                    ObjectOp::Get { key } => {
                        let got = store.get_object("", &key).await.ok();
                        assert_eq!(got.as_ref().map(Object::data), model.get(&key).map(Vec::as_slice));
                    }
                    ObjectOp::Delete { key } => {
                        let deleted = store.delete_object("", &key).await.is_ok();
                        assert_eq!(deleted, model.remove(&key).is_some());
                    }
                }
            }
        });
    }

    // The registry never grows past its capacity and rejected creations leave it unchanged
    #[test]
    fn prop_capacity_enforcement(
        names in prop::collection::vec(collection_strategy(), 1..40),
        max in 1usize..10
    ) {
        let store = test_store(max);

        block_on(async {
            for name in names {
                let before = store.collection_count().await;
                match store.new_collection(&name).await {
                    Ok(()) => assert_eq!(store.collection_count().await, before + 1),
                    Err(StoreError::CapacityExceeded(_)) | Err(StoreError::AlreadyExists(_)) => {
                        assert_eq!(store.collection_count().await, before)
                    }
                    Err(other) => panic!("unexpected error: {other}"),
                }
                assert!(store.collection_count().await <= max);
            }
        });
    }

    // Objects whose expiry is in the past are never returned, and stay gone
    #[test]
    fn prop_expired_objects_not_found(key in key_strategy(), seconds_ago in 1i64..100_000) {
        let store = test_store(4);

        block_on(async {
            let collection = store.get_collection("").await.unwrap();
            let expires_at = Utc::now() - chrono::Duration::seconds(seconds_ago);
            collection.set(key.clone(), Object::new(b"x".to_vec(), expires_at)).await;

            assert!(matches!(collection.get(&key).await, Err(StoreError::NotFound(_))));
            assert!(matches!(collection.get(&key).await, Err(StoreError::NotFound(_))));
        });
    }

    // Timeless objects outlive any default TTL horizon
    #[test]
    fn prop_timeless_outlives_default_ttl(ttl in 1u64..1_000_000, elapsed in 0i64..1_000_000) {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let object = Object::resolve_at(
            RequestSettings::new("x").timeless(),
            Duration::from_secs(ttl),
            now,
        );

        prop_assert!(!object.is_expired_at(now + chrono::Duration::seconds(elapsed)));
    }
}
