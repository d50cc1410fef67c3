//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了本地层（L1）缓存后端的实现，基于内存的有界键值存储。

use crate::config::EvictionPolicy;
use crate::error::{CacheError, Result};
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// 底层存储
///
/// `Arbitrary` 不维护任何访问顺序，满容量时从哈希表迭代顺序中取第一个条目淘汰，
/// 因此它并不是LRU；`Lru` 维护真正的访问顺序。
enum LocalStore {
    Arbitrary(HashMap<String, String>),
    Lru(LruCache<String, String>),
}

/// 本地层缓存后端
///
/// 有界、并发安全的键值存储。读写锁保证多读单写，
/// “检查容量-淘汰-插入”在写锁内原子完成，任何时刻条目数都不超过容量。
pub struct LocalBackend {
    store: RwLock<LocalStore>,
    capacity: NonZeroUsize,
    policy: EvictionPolicy,
}

impl std::fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalBackend")
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .finish()
    }
}

impl LocalBackend {
    /// 创建新的本地层后端（任意淘汰策略）
    ///
    /// # 参数
    ///
    /// * `capacity` - 最大条目数，必须大于0
    ///
    /// # 返回值
    ///
    /// 容量为0时返回 `CacheError::InvalidCapacity`
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_policy(capacity, EvictionPolicy::Arbitrary)
    }

    /// 使用指定淘汰策略创建本地层后端
    pub fn with_policy(capacity: usize, policy: EvictionPolicy) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity).ok_or_else(|| {
            CacheError::InvalidCapacity("local capacity must be greater than 0".to_string())
        })?;
        let store = match policy {
            EvictionPolicy::Arbitrary => {
                LocalStore::Arbitrary(HashMap::with_capacity(capacity.get()))
            }
            EvictionPolicy::Lru => LocalStore::Lru(LruCache::new(capacity)),
        };
        debug!(
            "L1 init: capacity={}, policy={:?}",
            capacity.get(),
            policy
        );
        Ok(Self {
            store: RwLock::new(store),
            capacity,
            policy,
        })
    }

    /// 获取缓存值
    ///
    /// `Arbitrary` 策略下只持有读锁；`Lru` 策略需要更新访问顺序，因此持有写锁。
    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self, key: &str) -> Option<String> {
        let value = match self.policy {
            EvictionPolicy::Arbitrary => match &*self.store.read().await {
                LocalStore::Arbitrary(map) => map.get(key).cloned(),
                LocalStore::Lru(cache) => cache.peek(key).cloned(),
            },
            EvictionPolicy::Lru => match &mut *self.store.write().await {
                LocalStore::Arbitrary(map) => map.get(key).cloned(),
                LocalStore::Lru(cache) => cache.get(key).cloned(),
            },
        };
        debug!("L1 get: key={}, found={}", key, value.is_some());
        value
    }

    /// 设置缓存值
    ///
    /// 键已存在时直接覆盖；满容量且键不存在时先淘汰恰好一个条目再插入。
    #[instrument(skip(self, value), level = "debug")]
    pub async fn set(&self, key: &str, value: String) {
        let mut guard = self.store.write().await;
        let evicted = match &mut *guard {
            LocalStore::Arbitrary(map) => {
                let mut evicted = None;
                if map.len() >= self.capacity.get() && !map.contains_key(key) {
                    let victim = map.keys().next().cloned();
                    if let Some(victim) = victim {
                        map.remove(&victim);
                        evicted = Some(victim);
                    }
                }
                map.insert(key.to_string(), value);
                evicted
            }
            LocalStore::Lru(cache) => cache
                .push(key.to_string(), value)
                .map(|(k, _)| k)
                .filter(|k| k != key),
        };
        if let Some(victim) = evicted {
            debug!("L1 set: key={}, evicted={}", key, victim);
        } else {
            debug!("L1 set: key={}", key);
        }
    }

    /// 检查键是否存在（不影响访问顺序）
    pub async fn contains(&self, key: &str) -> bool {
        match &*self.store.read().await {
            LocalStore::Arbitrary(map) => map.contains_key(key),
            LocalStore::Lru(cache) => cache.contains(key),
        }
    }

    /// 当前条目数
    pub async fn len(&self) -> usize {
        match &*self.store.read().await {
            LocalStore::Arbitrary(map) => map.len(),
            LocalStore::Lru(cache) => cache.len(),
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// 最大条目数
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// 淘汰策略
    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}
