//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了远程层（L2）的实现：按命名空间隔离、有界、按插入顺序淘汰。

use crate::backend::remote::RemoteStore;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// 远程层
///
/// `Disabled` 表示未配置远程连接：`get` 总是未命中，`set` 不做任何事，
/// 调用方无需区分远程层是否可用。
///
/// 远程层的任何错误都不会向上传播，只记录日志并按未命中/跳过处理。
#[derive(Clone)]
pub enum RemoteTier {
    Enabled(NamespacedTier),
    Disabled,
}

impl std::fmt::Debug for RemoteTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled(tier) => write!(
                f,
                "RemoteTier::Enabled(code={}, capacity={})",
                tier.code, tier.capacity
            ),
            Self::Disabled => write!(f, "RemoteTier::Disabled"),
        }
    }
}

impl RemoteTier {
    /// 根据可选的远程存储创建远程层
    pub fn new(code: &str, store: Option<Arc<dyn RemoteStore>>, capacity: usize) -> Self {
        match store {
            Some(store) => Self::Enabled(NamespacedTier::new(code, store, capacity)),
            None => Self::Disabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Enabled(tier) => tier.get(key).await,
            Self::Disabled => None,
        }
    }

    pub async fn set(&self, key: &str, value: &str) {
        if let Self::Enabled(tier) = self {
            tier.set(key, value).await;
        }
    }

    /// 命名空间内的条目数，未启用或出错时为0
    pub async fn len(&self) -> usize {
        match self {
            Self::Enabled(tier) => tier.len().await,
            Self::Disabled => 0,
        }
    }
}

/// 某个命名空间下的远程层
///
/// 数据存放在哈希 `code` 中，插入顺序记录在列表 `{code}_order` 中。
#[derive(Clone)]
pub struct NamespacedTier {
    code: String,
    order_key: String,
    store: Arc<dyn RemoteStore>,
    capacity: usize,
}

impl NamespacedTier {
    pub fn new(code: &str, store: Arc<dyn RemoteStore>, capacity: usize) -> Self {
        Self {
            code: code.to_string(),
            order_key: format!("{}_order", code),
            store,
            capacity,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn order_key(&self) -> &str {
        &self.order_key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 获取缓存值
    ///
    /// 键不存在是正常的未命中；传输错误记录后同样按未命中处理。
    #[instrument(skip(self), level = "debug", fields(code = %self.code))]
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.store.hget(&self.code, key).await {
            Ok(value) => {
                debug!("L2 get: key={}, found={}", key, value.is_some());
                value
            }
            Err(e) => {
                warn!("L2 get failed, treating as miss: key={}, error={}", key, e);
                None
            }
        }
    }

    /// 设置缓存值
    ///
    /// 依次执行 HLEN → (满时 LPOP + HDEL) → HSET → RPUSH。
    /// 整个序列跨多次往返且不是原子的，并发写入可能短暂超出容量。
    #[instrument(skip(self, value), level = "debug", fields(code = %self.code))]
    pub async fn set(&self, key: &str, value: &str) {
        let count = match self.store.hlen(&self.code).await {
            Ok(count) => count,
            Err(e) => {
                warn!("L2 set skipped, failed to read length: key={}, error={}", key, e);
                return;
            }
        };

        if count >= self.capacity {
            let oldest = match self.store.lpop(&self.order_key).await {
                Ok(Some(oldest)) => oldest,
                Ok(None) => {
                    warn!(
                        "L2 set skipped, order record is empty while hash holds {} entries: key={}",
                        count, key
                    );
                    return;
                }
                Err(e) => {
                    warn!("L2 set skipped, failed to pop oldest key: key={}, error={}", key, e);
                    return;
                }
            };

            match self.store.hdel(&self.code, &oldest).await {
                Ok(0) => warn!(
                    "L2 eviction target missing from hash, order record out of sync: evicted={}",
                    oldest
                ),
                Ok(_) => debug!("L2 evicted: key={}", oldest),
                Err(e) => warn!(
                    "L2 eviction failed, continuing without eviction: evicted={}, error={}",
                    oldest, e
                ),
            }
        }

        if let Err(e) = self.store.hset(&self.code, key, value).await {
            warn!("L2 set failed: key={}, error={}", key, e);
            return;
        }

        if let Err(e) = self.store.rpush(&self.order_key, key).await {
            warn!("L2 failed to record insertion order: key={}, error={}", key, e);
            return;
        }

        debug!("L2 set: key={}", key);
    }

    /// 命名空间内的条目数（HLEN），出错时记录日志并返回0
    pub async fn len(&self) -> usize {
        match self.store.hlen(&self.code).await {
            Ok(len) => len,
            Err(e) => {
                warn!("L2 len failed: error={}", e);
                0
            }
        }
    }
}
