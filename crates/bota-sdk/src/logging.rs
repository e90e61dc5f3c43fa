//! 日志初始化
//!
//! 库代码只通过 `tracing` 发出事件；应用在启动时调用一次 [`init_logging`]。
//! `RUST_LOG` 优先于默认过滤规则。

use tracing_subscriber::EnvFilter;

/// 默认过滤规则：SDK 各层输出 info 及以上
pub const DEFAULT_DIRECTIVES: &str = "bota_driver=info,bota_transport=info,bota_sdk=info";

/// 使用默认规则初始化日志
///
/// 返回是否由本次调用完成初始化；重复调用返回 `false`，不会 panic。
pub fn init_logging() -> bool {
    init_logging_with(DEFAULT_DIRECTIVES)
}

/// 使用指定的默认过滤规则初始化日志（`RUST_LOG` 存在时以其为准）
pub fn init_logging_with(default_directives: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return false;
    }

    // 将 `log` crate 的记录转发到 tracing（可能已由其他组件安装）
    let _ = tracing_log::LogTracer::init();
    true
}
