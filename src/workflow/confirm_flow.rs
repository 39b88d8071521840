//! 预约确认流程（演示用）
//!
//! 模拟一段固定耗时的处理，然后把预约标记为已确认

use crate::models::Appointment;
use crate::workflow::transform::{Transform, TransformFuture};
use chrono::Utc;
use std::time::Duration;
use tracing::debug;

/// 默认转换步骤：等待模拟耗时后确认预约
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmAppointment {
    simulated_work: Duration,
}

impl ConfirmAppointment {
    /// `Duration::ZERO` 表示不做人为延迟
    pub fn new(simulated_work: Duration) -> Self {
        Self { simulated_work }
    }
}

impl Transform<Appointment> for ConfirmAppointment {
    fn apply(&self, appointment: Appointment) -> TransformFuture<Appointment> {
        let simulated_work = self.simulated_work;
        Box::pin(async move {
            if !simulated_work.is_zero() {
                tokio::time::sleep(simulated_work).await;
            }
            debug!("[预约 {}] 已确认: {} / {}", appointment.id, appointment.customer_name, appointment.service_type);
            Ok(appointment.confirm(Utc::now()))
        })
    }
}
