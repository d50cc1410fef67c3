//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理器，负责把本地层、远程层和数据源串成一条读穿透链路。

use crate::backend::local::LocalBackend;
use crate::backend::redis_store::RedisStore;
use crate::backend::remote::RemoteStore;
use crate::client::{RemoteTier, SourceAdapter};
use crate::config::{CacheConfig, EvictionPolicy};
use crate::error::{CacheError, Result};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// 缓存管理器
///
/// 读取顺序：本地层 → 远程层（如已配置）→ 数据源，命中即返回，
/// 并把结果回填到所有更快的层。只有数据源的错误会返回给调用方。
pub struct CacheManager {
    code: String,
    local: LocalBackend,
    remote: RemoteTier,
    source: Arc<dyn SourceAdapter>,
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("code", &self.code)
            .field("local", &self.local)
            .field("remote", &self.remote)
            .finish()
    }
}

impl CacheManager {
    /// 创建缓存管理器
    ///
    /// # 参数
    ///
    /// * `code` - 命名空间
    /// * `local_capacity` - 本地层最大条目数，必须大于0
    /// * `remote` - 远程存储，`None` 表示不启用远程层
    /// * `remote_capacity` - 远程层最大条目数，仅在 `remote` 存在时有意义
    /// * `source` - 数据源适配器
    ///
    /// # 返回值
    ///
    /// 本地层容量非法时返回 `CacheError::InvalidCapacity`
    pub fn new(
        code: impl Into<String>,
        local_capacity: usize,
        remote: Option<Arc<dyn RemoteStore>>,
        remote_capacity: usize,
        source: Arc<dyn SourceAdapter>,
    ) -> Result<Self> {
        let mut builder = Self::builder(code)
            .local_capacity(local_capacity)
            .remote_capacity(remote_capacity)
            .source(source);
        if let Some(remote) = remote {
            builder = builder.remote_store(remote);
        }
        builder.build()
    }

    pub fn builder(code: impl Into<String>) -> CacheManagerBuilder {
        CacheManagerBuilder::new(code)
    }

    /// 根据配置创建缓存管理器
    ///
    /// 配置了远程层时会先建立Redis连接，连接失败则构造失败。
    #[instrument(skip(config, source), level = "info", fields(code = %config.code))]
    pub async fn from_config(config: &CacheConfig, source: Arc<dyn SourceAdapter>) -> Result<Self> {
        config.validate().map_err(CacheError::ConfigError)?;

        let mut builder = Self::builder(config.code.clone())
            .local_capacity(config.local.max_entries)
            .eviction_policy(config.local.eviction)
            .source(source);

        if let Some(remote_cfg) = &config.remote {
            let store = RedisStore::connect(remote_cfg).await?;
            builder = builder
                .remote_store(Arc::new(store))
                .remote_capacity(remote_cfg.max_entries);
        }

        builder.build()
    }

    /// 读穿透获取数据
    ///
    /// 键不做校验，原样交给各层和数据源。
    #[instrument(skip(self), level = "debug", fields(code = %self.code))]
    pub async fn get_data(&self, key: &str) -> Result<String> {
        if let Some(value) = self.local.get(key).await {
            debug!("get_data: key={}, hit=L1", key);
            return Ok(value);
        }

        if let Some(value) = self.remote.get(key).await {
            debug!("get_data: key={}, hit=L2", key);
            self.local.set(key, value.clone()).await;
            return Ok(value);
        }

        let value = self.source.fetch(key).await?;
        debug!("get_data: key={}, loaded from source", key);

        self.local.set(key, value.clone()).await;
        self.remote.set(key, &value).await;
        Ok(value)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// 本地层
    pub fn local(&self) -> &LocalBackend {
        &self.local
    }

    /// 远程层
    pub fn remote(&self) -> &RemoteTier {
        &self.remote
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_enabled()
    }
}

/// 缓存管理器构建器
pub struct CacheManagerBuilder {
    code: String,
    local_capacity: usize,
    eviction_policy: EvictionPolicy,
    remote_store: Option<Arc<dyn RemoteStore>>,
    remote_capacity: usize,
    source: Option<Arc<dyn SourceAdapter>>,
}

impl CacheManagerBuilder {
    fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            local_capacity: 0,
            eviction_policy: EvictionPolicy::default(),
            remote_store: None,
            remote_capacity: 0,
            source: None,
        }
    }

    pub fn local_capacity(mut self, capacity: usize) -> Self {
        self.local_capacity = capacity;
        self
    }

    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = policy;
        self
    }

    pub fn remote_store(mut self, store: Arc<dyn RemoteStore>) -> Self {
        self.remote_store = Some(store);
        self
    }

    pub fn remote_capacity(mut self, capacity: usize) -> Self {
        self.remote_capacity = capacity;
        self
    }

    pub fn source(mut self, source: Arc<dyn SourceAdapter>) -> Self {
        self.source = Some(source);
        self
    }

    /// 构建缓存管理器
    ///
    /// 未设置本地层容量（或为0）时返回 `CacheError::InvalidCapacity`，
    /// 未设置数据源时返回 `CacheError::ConfigError`。
    pub fn build(self) -> Result<CacheManager> {
        let local = LocalBackend::with_policy(self.local_capacity, self.eviction_policy)?;
        let source = self.source.ok_or_else(|| {
            CacheError::ConfigError(format!("Cache '{}' has no source adapter", self.code))
        })?;
        let remote = RemoteTier::new(&self.code, self.remote_store, self.remote_capacity);

        info!(
            "CacheManager initialized: code={}, local_capacity={}, policy={:?}, remote={:?}",
            self.code, self.local_capacity, self.eviction_policy, remote
        );

        Ok(CacheManager {
            code: self.code,
            local,
            remote,
            source,
        })
    }
}
