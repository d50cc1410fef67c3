//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块提供日志订阅器的初始化。

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG` 环境变量，未设置时使用 `default_filter`。
/// 库本身只产生日志事件，订阅器通常由应用层安装；重复调用是安全的，
/// 已存在全局订阅器时直接忽略。
///
/// # 参数
///
/// * `default_filter` - 默认过滤规则，例如 `"oxtier=debug"`
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(filter)
        .try_init()
        .ok();
}
