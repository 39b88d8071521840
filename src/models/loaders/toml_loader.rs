use crate::models::appointment::Appointment;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// TOML 文件结构：
///
/// ```toml
/// [[appointments]]
/// customer_name = "Alice Johnson"
/// service_type = "Oil Change"
/// scheduled_at = "2026-10-19T09:00:00Z"
/// ```
#[derive(Debug, Deserialize)]
struct AppointmentFile {
    #[serde(default)]
    appointments: Vec<Appointment>,
}

/// 从 TOML 文件加载预约列表，未填写的 id 会自动生成
pub async fn load_appointments(path: &Path) -> Result<Vec<Appointment>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取TOML文件: {}", path.display()))?;

    let file: AppointmentFile = toml::from_str(&content)
        .with_context(|| format!("无法解析TOML文件: {}", path.display()))?;

    tracing::info!("成功加载 {} 条预约", file.appointments.len());
    Ok(file.appointments)
}
