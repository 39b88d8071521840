//! # Appointment Batch
//!
//! 并发处理服务预约的 Rust 应用程序
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models）
//! - `models/` - 预约、处理结果、统计快照
//! - `WorkItem` - 可被批处理的记录（只要求稳定 ID）
//!
//! ### ② 流程层（Workflow）
//! - `workflow/` - 定义"一条记录"如何被处理
//! - `Transform` - 可注入的转换步骤
//! - `ConfirmAppointment` - 演示用的确认流程（模拟耗时）
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 并发批处理器，管理并发、顺序、取消和统计
//! - `orchestrator/app` - 演示应用
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, ProcessError};
pub use models::{Appointment, AppointmentStatus, BatchReport, ProcessOutcome, StatsSnapshot, WorkItem};
pub use orchestrator::{App, BatchProcessor};
pub use workflow::{transform_fn, ConfirmAppointment, Transform};
