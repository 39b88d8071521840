use crate::error::{AppError, AppResult};
use crate::orchestrator::batch_processor::DEFAULT_MAX_CONCURRENCY;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 默认配置文件名（可通过 `APP_CONFIG` 覆盖）
pub const DEFAULT_CONFIG_FILE: &str = "appointment_batch.toml";

/// 程序配置文件
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时处理的记录数量上限
    pub max_concurrency: usize,
    /// 模拟处理耗时（毫秒），0 表示不做人为延迟
    pub simulated_work_ms: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// tracing 过滤表达式
    pub log_filter: String,
    /// 预约数据文件（TOML），未设置时使用样例数据
    pub input_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            simulated_work_ms: 100,
            verbose_logging: false,
            log_filter: "info".to_string(),
            input_file: None,
        }
    }
}

impl Config {
    /// 先读配置文件（不存在则跳过），再用环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let base = if Path::new(&path).exists() {
            Self::from_toml_file(&path)?
        } else {
            Self::default()
        };
        Ok(base.with_env_overrides())
    }

    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|source| AppError::Config {
            path: path.to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            max_concurrency: std::env::var("MAX_CONCURRENCY").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_concurrency),
            simulated_work_ms: std::env::var("SIMULATED_WORK_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(self.simulated_work_ms),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            log_filter: std::env::var("LOG_FILTER").unwrap_or(self.log_filter),
            input_file: std::env::var("INPUT_FILE").ok().or(self.input_file),
        }
    }

    /// 模拟处理耗时
    pub fn simulated_work(&self) -> Duration {
        Duration::from_millis(self.simulated_work_ms)
    }
}
