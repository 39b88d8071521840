//! 预约数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 可被批处理的记录
///
/// 只要求一个稳定的字符串标识，处理结果与输入按该标识一一对应
pub trait WorkItem: Send + 'static {
    fn id(&self) -> &str;
}

/// 预约状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
}

/// 服务预约
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default = "new_id")]
    pub id: String,
    pub customer_name: String,
    pub service_type: String,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// 创建一条待处理的预约（自动生成 UUID）
    pub fn new(
        customer_name: impl Into<String>,
        service_type: impl Into<String>,
        scheduled_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_id(),
            customer_name: customer_name.into(),
            service_type: service_type.into(),
            scheduled_at,
            status: AppointmentStatus::Pending,
            processed_at: None,
        }
    }

    /// 标记为已确认
    pub fn confirm(mut self, at: DateTime<Utc>) -> Self {
        self.processed_at = Some(at);
        self.status = AppointmentStatus::Confirmed;
        self
    }
}

impl WorkItem for Appointment {
    fn id(&self) -> &str {
        &self.id
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
