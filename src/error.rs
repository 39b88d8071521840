//! 错误类型
//!
//! 分两层：
//! - `ProcessError`：单条记录的处理失败，被限制在所属结果槽位内，不会中断整批
//! - `AppError`：致命错误（并发原语无法启动、配置解析失败等），立即向调用方传播

use serde::Serialize;
use thiserror::Error;

/// 单条记录处理错误
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProcessError {
    /// 转换步骤返回失败
    #[error("记录 {id} 处理失败: {reason}")]
    TransformationFailed { id: String, reason: String },

    /// 转换步骤发生 panic
    #[error("记录 {id} 处理时发生 panic: {message}")]
    Panicked { id: String, message: String },
}

impl ProcessError {
    /// 创建转换失败错误
    pub fn transformation_failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        ProcessError::TransformationFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// 出错记录的 ID
    pub fn id(&self) -> &str {
        match self {
            ProcessError::TransformationFailed { id, .. } | ProcessError::Panicked { id, .. } => id,
        }
    }
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 无法获取并发许可（信号量已关闭）
    #[error("并发调度失败: {0}")]
    Concurrency(#[from] tokio::sync::AcquireError),

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    Config {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 文件读取失败
    #[error("文件错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON 序列化失败
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
