//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的配置结构和解析逻辑。

use crate::error::{CacheError, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_VERSION: u32 = 1;

/// 缓存配置
///
/// 一个配置对应一个命名空间（`code`）下的缓存管理器
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default)]
    pub config_version: Option<u32>,
    /// 命名空间，远程层的所有键都以它为作用域
    pub code: String,
    /// 本地层配置
    #[serde(default)]
    pub local: LocalConfig,
    /// 远程层配置，缺省表示不启用远程层
    #[serde(default)]
    pub remote: Option<RemoteConfig>,
}

/// 本地层淘汰策略
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// 淘汰任意一个已有条目，不维护访问顺序（并非LRU）
    #[default]
    Arbitrary,
    /// 真正的最近最少使用淘汰
    Lru,
}

/// 本地层（L1）配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LocalConfig {
    /// 最大条目数，必须大于0
    pub max_entries: usize,
    /// 淘汰策略
    pub eviction: EvictionPolicy,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            eviction: EvictionPolicy::Arbitrary,
        }
    }
}

/// 远程层（L2）配置
///
/// 定义Redis连接及远程层容量
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RemoteConfig {
    /// 连接字符串
    pub connection_string: SecretString,
    /// 命名空间内的最大条目数
    pub max_entries: usize,
    /// 连接超时时间（毫秒）
    pub connection_timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            connection_string: SecretString::new("redis://localhost:6379".to_string().into()),
            max_entries: 10000,
            connection_timeout_ms: 5000,
        }
    }
}

impl CacheConfig {
    /// 创建仅包含本地层的配置
    pub fn new(code: impl Into<String>, max_local_entries: usize) -> Self {
        Self {
            config_version: Some(CONFIG_VERSION),
            code: code.into(),
            local: LocalConfig {
                max_entries: max_local_entries,
                ..Default::default()
            },
            remote: None,
        }
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| CacheError::ConfigError(e.to_string()))
    }

    /// 从TOML文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 验证配置
    ///
    /// 检查命名空间、容量和超时设置的有效性
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = &self.config_version {
            if *version > CONFIG_VERSION {
                return Err(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                ));
            }
        }

        if self.code.is_empty() {
            return Err("Cache code cannot be empty".to_string());
        }

        if self.local.max_entries == 0 {
            return Err(format!(
                "Cache '{}' local max_entries must be greater than 0",
                self.code
            ));
        }

        if let Some(remote) = &self.remote {
            let timeout = remote.connection_timeout_ms;
            if !(100..=30000).contains(&timeout) {
                return Err(format!(
                    "Cache '{}' connection_timeout_ms must be between 100 and 30000 ms",
                    self.code
                ));
            }
        }

        Ok(())
    }
}
