//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了远程存储的抽象接口和进程内实现。

use crate::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;

/// 远程存储接口
///
/// 远程层只依赖哈希表和列表的六个原语。命名空间由调用方拼接进
/// `hash`/`list` 参数，存储本身不感知命名空间。
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// 读取哈希字段，字段不存在时返回 `Ok(None)`
    async fn hget(&self, hash: &str, field: &str) -> Result<Option<String>>;

    /// 写入哈希字段
    async fn hset(&self, hash: &str, field: &str, value: &str) -> Result<()>;

    /// 哈希字段数量
    async fn hlen(&self, hash: &str) -> Result<usize>;

    /// 删除哈希字段，返回实际删除的数量
    async fn hdel(&self, hash: &str, field: &str) -> Result<usize>;

    /// 追加到列表尾部，返回追加后的列表长度
    async fn rpush(&self, list: &str, value: &str) -> Result<usize>;

    /// 弹出列表头部元素，列表为空时返回 `Ok(None)`
    async fn lpop(&self, list: &str) -> Result<Option<String>>;
}

#[derive(Default)]
struct MemoryState {
    hashes: HashMap<String, HashMap<String, String>>,
    lists: HashMap<String, VecDeque<String>>,
}

/// 进程内远程存储
///
/// 语义与Redis的 HGET/HSET/HLEN/HDEL/RPUSH/LPOP 一致，
/// 可通过 `Arc` 在多个缓存管理器之间共享。
#[derive(Default)]
pub struct MemoryRemoteStore {
    state: Mutex<MemoryState>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列表当前内容（测试和诊断用）
    pub async fn list_snapshot(&self, list: &str) -> Vec<String> {
        let state = self.state.lock().await;
        state
            .lists
            .get(list)
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn hget(&self, hash: &str, field: &str) -> Result<Option<String>> {
        let state = self.state.lock().await;
        Ok(state.hashes.get(hash).and_then(|h| h.get(field).cloned()))
    }

    async fn hset(&self, hash: &str, field: &str, value: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .hashes
            .entry(hash.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hlen(&self, hash: &str) -> Result<usize> {
        let state = self.state.lock().await;
        Ok(state.hashes.get(hash).map_or(0, HashMap::len))
    }

    async fn hdel(&self, hash: &str, field: &str) -> Result<usize> {
        let mut state = self.state.lock().await;
        let removed = match state.hashes.get_mut(hash) {
            Some(h) => usize::from(h.remove(field).is_some()),
            None => 0,
        };
        // Redis drops empty keys
        if state.hashes.get(hash).is_some_and(HashMap::is_empty) {
            state.hashes.remove(hash);
        }
        Ok(removed)
    }

    async fn rpush(&self, list: &str, value: &str) -> Result<usize> {
        let mut state = self.state.lock().await;
        let l = state.lists.entry(list.to_string()).or_default();
        l.push_back(value.to_string());
        Ok(l.len())
    }

    async fn lpop(&self, list: &str) -> Result<Option<String>> {
        let mut state = self.state.lock().await;
        let popped = state.lists.get_mut(list).and_then(VecDeque::pop_front);
        if state.lists.get(list).is_some_and(VecDeque::is_empty) {
            state.lists.remove(list);
        }
        Ok(popped)
    }
}
