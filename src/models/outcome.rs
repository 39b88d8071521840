//! 批处理结果
//!
//! 每条输入对应一个 `ProcessOutcome`，位置与输入一一对应

use crate::error::ProcessError;
use crate::models::appointment::WorkItem;
use serde::Serialize;

/// 单条记录的处理结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum ProcessOutcome<T> {
    /// 处理成功，携带转换后的记录
    Completed(T),
    /// 处理失败，保留原始记录 ID
    Failed { id: String, error: ProcessError },
    /// 批次被取消，记录未完成
    Cancelled { id: String },
}

impl<T: WorkItem> ProcessOutcome<T> {
    pub fn id(&self) -> &str {
        match self {
            ProcessOutcome::Completed(item) => item.id(),
            ProcessOutcome::Failed { id, .. } | ProcessOutcome::Cancelled { id } => id,
        }
    }
}

impl<T> ProcessOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, ProcessOutcome::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessOutcome::Failed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessOutcome::Cancelled { .. })
    }

    pub fn as_completed(&self) -> Option<&T> {
        match self {
            ProcessOutcome::Completed(item) => Some(item),
            _ => None,
        }
    }
}

/// 可取消批次的处理报告
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<T> {
    /// 与输入等长、同序的结果
    pub outcomes: Vec<ProcessOutcome<T>>,
    /// 本批是否被取消
    pub cancelled: bool,
}

impl<T> BatchReport<T> {
    /// 是否只得到了部分结果
    pub fn is_partial(&self) -> bool {
        self.cancelled && self.outcomes.iter().any(ProcessOutcome::is_cancelled)
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_completed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    pub fn cancelled_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_cancelled()).count()
    }
}
