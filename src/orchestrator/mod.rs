//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 并发批处理器
//! - 为每条记录启动独立任务（Semaphore 限制并发）
//! - 按输入顺序收集结果
//! - 支持取消
//!
//! ### `stats_recorder` - 共享统计
//! - 单把互斥锁保护的计数器
//!
//! ### `app` - 演示应用
//! - 加载预约、运行批次、打印结果
//!
//! ## 层次关系
//!
//! ```text
//! app (加载数据 / 输出结果)
//!     ↓
//! batch_processor (处理 Vec<T>)
//!     ↓
//! workflow::Transform (处理单条记录)
//! ```

pub mod app;
pub mod batch_processor;
pub mod stats_recorder;

// 重新导出主要类型
pub use app::{App, RunSummary};
pub use batch_processor::BatchProcessor;
pub use stats_recorder::StatsRecorder;
