//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了缓存系统的存储后端，包括本地层存储和远程存储。

pub mod local;
pub mod redis_store;
pub mod remote;
