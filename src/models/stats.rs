//! 处理统计快照

use serde::{Serialize, Serializer};
use std::time::Duration;

/// 某一时刻的一致统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// 成功处理的记录总数（只增不减）
    pub total_processed: u64,
    /// 最近一条完成记录的耗时
    #[serde(rename = "last_duration_ms", serialize_with = "as_millis")]
    pub last_duration: Duration,
    /// 成功记录的平均耗时
    #[serde(rename = "average_duration_ms", serialize_with = "as_millis")]
    pub average_duration: Duration,
    /// 失败记录数
    pub errors: u64,
    /// 因取消而未完成的记录数
    pub cancelled: u64,
}

impl StatsSnapshot {
    /// 已结束（成功或失败）的记录数
    pub fn settled(&self) -> u64 {
        self.total_processed + self.errors
    }
}

fn as_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
}
