//! 数据源适配器
//!
//! 缓存三级都未命中时，从权威数据源加载数据

use crate::error::Result;
use async_trait::async_trait;
use std::future::Future;

/// 数据源适配器trait
///
/// 实现方必须支持并发调用，且自身不能再做缓存，否则会掩盖缓存层的分层行为。
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// 根据键从数据源加载数据
    ///
    /// # 参数
    ///
    /// * `key` - 缓存键，原样传入，不做校验
    ///
    /// # 返回值
    ///
    /// 返回加载的数据；键不存在时应返回 `CacheError::NotFound`，
    /// 其他失败返回对应错误。错误会原样透传给调用方。
    async fn fetch(&self, key: &str) -> Result<String>;
}

/// 基于闭包的数据源适配器
///
/// ```
/// use oxtier::client::source::{FnSource, SourceAdapter};
/// use oxtier::error::CacheError;
///
/// # tokio_test_block(async {
/// let source = FnSource::new(|key: String| async move { Ok::<_, CacheError>(key.to_uppercase()) });
/// assert_eq!(source.fetch("a").await.unwrap(), "A");
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub struct FnSource<F> {
    f: F,
}

impl<F> FnSource<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> SourceAdapter for FnSource<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String>> + Send,
{
    async fn fetch(&self, key: &str) -> Result<String> {
        (self.f)(key.to_string()).await
    }
}
