//! 日志工具模块
//!
//! 初始化 tracing 订阅器，日志级别通过 RUST_LOG 环境变量控制，
//! 默认 info。

use tracing_subscriber::EnvFilter;

/// 初始化日志，可重复调用（测试里多次初始化只有第一次生效）
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
