//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use crate::config::Config;
use crate::models::StatsSnapshot;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先，其次使用配置中的 `log_filter`；`verbose_logging` 打开时为 debug。
/// 重复调用不会报错
pub fn init(config: &Config) {
    let fallback = if config.verbose_logging {
        "debug"
    } else {
        config.log_filter.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 并发预约处理模式");
    info!("📊 最大并发数: {}", config.max_concurrency);
    info!("⏱️ 模拟处理耗时: {:?}", config.simulated_work());
    info!("{}", "=".repeat(60));
}

/// 记录预约加载信息
///
/// # 参数
/// - `total`: 预约总数
/// - `source`: 数据来源
pub fn log_appointments_loaded(total: usize, source: &str) {
    info!("✓ 从 {} 加载了 {} 条待处理的预约", source, total);
}

/// 记录批次开始信息
///
/// # 参数
/// - `total`: 本批记录数
/// - `max_concurrency`: 并发上限
pub fn log_batch_start(total: usize, max_concurrency: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理批次: {} 条记录", total);
    info!("📊 并发上限: {}", max_concurrency);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
///
/// # 参数
/// - `completed`: 成功数量
/// - `failed`: 失败数量
/// - `cancelled`: 取消数量
/// - `total`: 本批记录数
pub fn log_batch_complete(completed: usize, failed: usize, cancelled: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ 批次完成: 成功 {}/{}, 失败 {}, 取消 {}",
        completed, total, failed, cancelled
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `stats`: 统计快照
pub fn print_final_stats(stats: &StatsSnapshot) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}", stats.total_processed);
    info!("❌ 失败: {}", stats.errors);
    info!("⏹️ 取消: {}", stats.cancelled);
    info!("⏱️ 最近耗时: {:?} / 平均耗时: {:?}", stats.last_duration, stats.average_duration);
    info!("{}", "=".repeat(60));
}
