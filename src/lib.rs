//! oxtier - 读穿透两级缓存库
//!
//! 本地内存层（有界，可选任意淘汰或LRU）+ 可选的Redis远程层（按命名空间隔离、
//! 按插入顺序淘汰），未命中时从调用方提供的数据源加载并回填。
//! 远程层故障一律降级为未命中，只有数据源错误会返回给调用方。

#![doc(html_root_url = "https://docs.rs/oxtier/0.1.0")]

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod manager;
pub mod telemetry;
pub mod utils;

pub use backend::local::LocalBackend;
pub use backend::redis_store::RedisStore;
pub use backend::remote::{MemoryRemoteStore, RemoteStore};
pub use client::{FnSource, RemoteTier, SourceAdapter};
pub use config::{CacheConfig, EvictionPolicy};
pub use error::{CacheError, Result};
pub use manager::{CacheManager, CacheManagerBuilder};

/// oxtier 版本号
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
