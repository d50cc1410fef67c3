//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! Redis远程层集成测试，Redis不可用时跳过

use oxtier::backend::redis_store::RedisStore;
use oxtier::backend::remote::RemoteStore;
use oxtier::config::{CacheConfig, RemoteConfig};
use oxtier::CacheManager;
use secrecy::SecretString;
use std::sync::Arc;

#[path = "../common/mod.rs"]
mod common;

use common::CountingSource;

fn remote_config(max_entries: usize) -> RemoteConfig {
    RemoteConfig {
        connection_string: SecretString::new(common::redis_url().into()),
        max_entries,
        connection_timeout_ms: 2000,
    }
}

async fn cleanup(code: &str) {
    let mut conn = redis::Client::open(common::redis_url())
        .unwrap()
        .get_multiplexed_async_connection()
        .await
        .unwrap();
    let _: redis::RedisResult<()> = redis::cmd("DEL")
        .arg(code)
        .arg(format!("{}_order", code))
        .query_async(&mut conn)
        .await;
}

#[tokio::test]
async fn test_redis_store_primitives() {
    common::setup_logging();

    if !common::is_redis_available().await {
        println!("跳过测试: Redis不可用");
        return;
    }

    let store = RedisStore::connect(&remote_config(10)).await.unwrap();
    let code = common::generate_unique_code("oxtier_primitives");
    let order = format!("{}_order", code);

    assert_eq!(store.hget(&code, "f").await.unwrap(), None);
    store.hset(&code, "f", "v").await.unwrap();
    assert_eq!(store.hget(&code, "f").await.unwrap(), Some("v".to_string()));
    assert_eq!(store.hlen(&code).await.unwrap(), 1);
    assert_eq!(store.hdel(&code, "f").await.unwrap(), 1);
    assert_eq!(store.hlen(&code).await.unwrap(), 0);

    assert_eq!(store.lpop(&order).await.unwrap(), None);
    assert_eq!(store.rpush(&order, "a").await.unwrap(), 1);
    assert_eq!(store.rpush(&order, "b").await.unwrap(), 2);
    assert_eq!(store.lpop(&order).await.unwrap(), Some("a".to_string()));

    cleanup(&code).await;
}

#[tokio::test]
async fn test_redis_fifo_eviction_and_isolation() {
    common::setup_logging();

    if !common::is_redis_available().await {
        println!("跳过测试: Redis不可用");
        return;
    }

    let store = RedisStore::connect(&remote_config(1)).await.unwrap();
    let shared: Arc<dyn RemoteStore> = Arc::new(store);
    let code_a = common::generate_unique_code("oxtier_a");
    let code_b = common::generate_unique_code("oxtier_b");

    let source_a = Arc::new(
        CountingSource::new()
            .with_value("x", "1")
            .with_value("y", "2"),
    );
    let manager_a = CacheManager::new(code_a.clone(), 4, Some(shared.clone()), 1, source_a).unwrap();
    let source_b = Arc::new(CountingSource::new().with_value("x", "other"));
    let manager_b = CacheManager::new(code_b.clone(), 4, Some(shared.clone()), 1, source_b).unwrap();

    assert_eq!(manager_a.get_data("x").await.unwrap(), "1");
    assert_eq!(manager_a.get_data("y").await.unwrap(), "2");
    assert_eq!(manager_b.get_data("x").await.unwrap(), "other");

    assert_eq!(manager_a.remote().get("x").await, None);
    assert_eq!(manager_a.remote().get("y").await, Some("2".to_string()));
    assert_eq!(manager_b.remote().get("x").await, Some("other".to_string()));

    cleanup(&code_a).await;
    cleanup(&code_b).await;
}

#[tokio::test]
async fn test_from_config_with_redis() {
    common::setup_logging();

    if !common::is_redis_available().await {
        println!("跳过测试: Redis不可用");
        return;
    }

    let code = common::generate_unique_code("oxtier_cfg");
    let mut config = CacheConfig::new(code.clone(), 2);
    config.remote = Some(remote_config(5));

    let source = Arc::new(CountingSource::new().with_value("k", "v"));
    let manager = CacheManager::from_config(&config, source.clone()).await.unwrap();
    assert!(manager.has_remote());
    assert_eq!(manager.get_data("k").await.unwrap(), "v");
    assert_eq!(manager.remote().len().await, 1);

    cleanup(&code).await;
}
