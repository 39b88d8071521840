//! 演示用样例数据

use crate::models::appointment::Appointment;
use chrono::{Duration, Utc};

/// 生成三条待处理的样例预约，分别安排在 1/2/3 天之后
pub fn sample_appointments() -> Vec<Appointment> {
    let now = Utc::now();
    vec![
        Appointment::new("Alice Johnson", "Oil Change", now + Duration::hours(24)),
        Appointment::new("Bob Wilson", "Brake Inspection", now + Duration::hours(48)),
        Appointment::new("Carol Davis", "Tire Rotation", now + Duration::hours(72)),
    ]
}
