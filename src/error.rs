//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的错误类型和处理机制。

use thiserror::Error;

/// 缓存系统错误类型枚举
///
/// 只有数据源错误会透传给 `get_data` 的调用方，
/// 远程层的错误在层内部记录日志后按未命中处理。
#[derive(Error, Debug)]
pub enum CacheError {
    /// 容量参数非法（构造时立即失败，不做截断）
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 数据源中不存在该键
    #[error("Key not found in source: {0}")]
    NotFound(String),

    /// 数据源读取失败
    #[error("Source error: {0}")]
    SourceError(String),

    /// L2（远程层）连接建立失败
    #[error("L2 operation failed: {0}")]
    L2Error(String),

    /// Redis错误
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// 缓存操作结果类型别名
///
/// 简化错误处理，所有缓存操作都返回此类型
pub type Result<T> = std::result::Result<T, CacheError>;
