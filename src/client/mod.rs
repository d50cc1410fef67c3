//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存管理器使用的各层客户端：远程层和数据源适配器。

pub mod remote_tier;
pub mod source;

pub use remote_tier::{NamespacedTier, RemoteTier};
pub use source::{FnSource, SourceAdapter};
