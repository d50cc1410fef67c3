//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 远程层测试：按插入顺序淘汰、命名空间隔离、并发写入的最终容量

use oxtier::backend::remote::{MemoryRemoteStore, RemoteStore};
use oxtier::client::RemoteTier;
use oxtier::CacheManager;
use std::sync::Arc;

#[path = "../common/mod.rs"]
mod common;

use common::CountingSource;

#[tokio::test]
async fn test_remote_capacity_one_evicts_oldest() {
    common::setup_logging();

    let store: Arc<dyn RemoteStore> = Arc::new(MemoryRemoteStore::new());
    let code = common::generate_unique_code("cap_one");
    let tier = RemoteTier::new(&code, Some(store), 1);

    tier.set("x", "1").await;
    tier.set("y", "2").await;

    assert_eq!(tier.get("x").await, None);
    assert_eq!(tier.get("y").await, Some("2".to_string()));
}

#[tokio::test]
async fn test_namespace_isolation_on_shared_store() {
    common::setup_logging();

    let store: Arc<dyn RemoteStore> = Arc::new(MemoryRemoteStore::new());
    let first = RemoteTier::new("tenant_a", Some(store.clone()), 2);
    let second = RemoteTier::new("tenant_b", Some(store.clone()), 2);

    first.set("shared", "from_a").await;
    second.set("shared", "from_b").await;

    assert_eq!(first.get("shared").await, Some("from_a".to_string()));
    assert_eq!(second.get("shared").await, Some("from_b".to_string()));

    // filling one namespace must not evict from the other
    first.set("a1", "1").await;
    first.set("a2", "2").await;
    assert_eq!(first.get("shared").await, None);
    assert_eq!(second.get("shared").await, Some("from_b".to_string()));
    assert_eq!(second.len().await, 1);
}

#[tokio::test]
async fn test_managers_with_different_codes_are_isolated() {
    common::setup_logging();

    let store: Arc<dyn RemoteStore> = Arc::new(MemoryRemoteStore::new());
    let source_a = Arc::new(CountingSource::new().with_value("k", "A"));
    let source_b = Arc::new(CountingSource::new().with_value("k", "B"));
    let manager_a = CacheManager::new("svc_a", 4, Some(store.clone()), 4, source_a).unwrap();
    let manager_b = CacheManager::new("svc_b", 4, Some(store.clone()), 4, source_b).unwrap();

    assert_eq!(manager_a.get_data("k").await.unwrap(), "A");
    assert_eq!(manager_b.get_data("k").await.unwrap(), "B");

    // fresh managers read the remote tier only
    let empty_a = CacheManager::new(
        "svc_a",
        4,
        Some(store.clone()),
        4,
        Arc::new(CountingSource::new()),
    )
    .unwrap();
    let empty_b = CacheManager::new(
        "svc_b",
        4,
        Some(store.clone()),
        4,
        Arc::new(CountingSource::new()),
    )
    .unwrap();
    assert_eq!(empty_a.get_data("k").await.unwrap(), "A");
    assert_eq!(empty_b.get_data("k").await.unwrap(), "B");
}

#[tokio::test]
async fn test_remote_capacity_holds_for_sequential_writes() {
    common::setup_logging();

    let store = Arc::new(MemoryRemoteStore::new());
    let tier = RemoteTier::new("sequential", Some(store.clone() as Arc<dyn RemoteStore>), 3);

    for i in 0..20 {
        tier.set(&format!("k{}", i), &i.to_string()).await;
        assert!(tier.len().await <= 3);
    }
    assert_eq!(
        store.list_snapshot("sequential_order").await,
        vec!["k17", "k18", "k19"]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_overshoot_is_bounded() {
    common::setup_logging();

    const CAPACITY: usize = 4;
    const WRITERS: usize = 16;

    let store = Arc::new(MemoryRemoteStore::new());
    let tier = RemoteTier::new(
        "racy",
        Some(store.clone() as Arc<dyn RemoteStore>),
        CAPACITY,
    );

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let tier = tier.clone();
            tokio::spawn(async move {
                for i in 0..10 {
                    tier.set(&format!("w{}_{}", w, i), "v").await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    // HLEN -> LPOP/HDEL -> HSET -> RPUSH is not atomic, so racing writers may
    // each insert after observing a free slot; every race adds at most one entry
    let len = tier.len().await;
    assert!(len <= CAPACITY + WRITERS, "remote tier overshoot: {}", len);

    // once writers are quiet, writes no longer grow the tier past its cap or its overshoot
    let bound = len.max(CAPACITY);
    for i in 0..8 {
        tier.set(&format!("settle{}", i), "v").await;
        assert!(tier.len().await <= bound);
    }
    assert_eq!(tier.get("settle7").await, Some("v".to_string()));
}
