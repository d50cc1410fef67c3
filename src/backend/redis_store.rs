//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了基于Redis的远程存储实现。

use crate::backend::remote::RemoteStore;
use crate::config::RemoteConfig;
use crate::error::{CacheError, Result};
use crate::utils::redaction::redact_connection_string;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};
use secrecy::ExposeSecret;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, instrument};

/// Redis远程存储
///
/// 基于 `ConnectionManager`，断线后自动重连。克隆开销很小，
/// 多个缓存管理器可以共享同一个连接（以 `Arc<dyn RemoteStore>` 形式）。
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedisStore")
    }
}

impl RedisStore {
    /// 使用已有的连接管理器创建远程存储
    pub fn new(manager: ConnectionManager) -> Self {
        Self { manager }
    }

    /// 根据配置建立Redis连接
    ///
    /// # 参数
    ///
    /// * `config` - 远程层配置
    ///
    /// # 返回值
    ///
    /// 连接超时返回 `CacheError::L2Error`，其他连接错误返回 `CacheError::RedisError`
    #[instrument(skip(config), level = "info", name = "connect_redis_store")]
    pub async fn connect(config: &RemoteConfig) -> Result<Self> {
        let connection_string = config.connection_string.expose_secret();
        let redacted = redact_connection_string(connection_string);
        debug!("Connecting to Redis: {}", redacted);

        let client = Client::open(connection_string)?;
        let manager = match timeout(
            Duration::from_millis(config.connection_timeout_ms),
            client.get_connection_manager(),
        )
        .await
        {
            Ok(res) => res?,
            Err(_) => {
                return Err(CacheError::L2Error(format!(
                    "Connection timed out after {}ms. Target: {}",
                    config.connection_timeout_ms, redacted
                )));
            }
        };
        info!("Connected to Redis: {}", redacted);
        Ok(Self { manager })
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn hget(&self, hash: &str, field: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        Ok(conn.hget(hash, field).await?)
    }

    async fn hset(&self, hash: &str, field: &str, value: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let _: () = conn.hset(hash, field, value).await?;
        Ok(())
    }

    async fn hlen(&self, hash: &str) -> Result<usize> {
        let mut conn = self.manager.clone();
        Ok(conn.hlen(hash).await?)
    }

    async fn hdel(&self, hash: &str, field: &str) -> Result<usize> {
        let mut conn = self.manager.clone();
        Ok(conn.hdel(hash, field).await?)
    }

    async fn rpush(&self, list: &str, value: &str) -> Result<usize> {
        let mut conn = self.manager.clone();
        Ok(conn.rpush(list, value).await?)
    }

    async fn lpop(&self, list: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        Ok(conn.lpop(list, None).await?)
    }
}
