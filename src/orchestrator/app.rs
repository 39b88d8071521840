//! 演示应用
//!
//! 加载预约（TOML 文件或样例数据），交给 `BatchProcessor` 并发确认，
//! 然后把结果和统计以 JSON 打印到标准输出。Ctrl-C 会取消正在进行的批次。

use crate::config::Config;
use crate::models::{load_appointments, sample_appointments, Appointment, BatchReport, StatsSnapshot};
use crate::orchestrator::BatchProcessor;
use crate::utils::logging::{log_appointments_loaded, log_startup, print_final_stats};
use crate::workflow::ConfirmAppointment;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// 应用主结构
pub struct App {
    config: Config,
    processor: BatchProcessor<Appointment>,
}

/// 一次运行的输出
#[derive(Debug)]
pub struct RunSummary {
    pub report: BatchReport<Appointment>,
    pub stats: StatsSnapshot,
    pub elapsed: std::time::Duration,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Self {
        log_startup(&config);

        let processor = BatchProcessor::new(ConfirmAppointment::new(config.simulated_work()))
            .with_max_concurrency(config.max_concurrency);

        Self { config, processor }
    }

    pub fn processor(&self) -> &BatchProcessor<Appointment> {
        &self.processor
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        println!("RL Auto Shop - Appointment Batch CLI");
        println!("====================================\n");

        let token = CancellationToken::new();
        let ctrl_c_token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⚠️ 收到中断信号，正在取消批次...");
                ctrl_c_token.cancel();
            }
        });

        let appointments = self.load_appointments().await?;

        println!("Processing appointments concurrently...");
        let summary = self.process(appointments, token).await?;

        println!(
            "\nProcessed {} appointments in {:?}\n",
            summary.report.completed_count(),
            summary.elapsed
        );
        for outcome in &summary.report.outcomes {
            println!("{}\n", serde_json::to_string_pretty(outcome)?);
        }

        println!("Processing Statistics:");
        println!("{}", serde_json::to_string_pretty(&summary.stats)?);

        if summary.report.is_partial() {
            println!("\nBatch cancelled, results are partial.");
        }
        println!("\nDemonstration complete.");

        print_final_stats(&summary.stats);
        Ok(())
    }

    /// 处理一批预约并计时
    pub async fn process(
        &self,
        appointments: Vec<Appointment>,
        token: CancellationToken,
    ) -> Result<RunSummary> {
        let start = Instant::now();
        let report = self
            .processor
            .process_batch_with_cancel(appointments, token)
            .await
            .context("批处理无法启动")?;

        Ok(RunSummary {
            report,
            stats: self.processor.stats(),
            elapsed: start.elapsed(),
        })
    }

    /// 加载预约
    async fn load_appointments(&self) -> Result<Vec<Appointment>> {
        match &self.config.input_file {
            Some(path) => {
                let appointments = load_appointments(Path::new(path)).await?;
                log_appointments_loaded(appointments.len(), path);
                Ok(appointments)
            }
            None => {
                let appointments = sample_appointments();
                log_appointments_loaded(appointments.len(), "样例数据");
                Ok(appointments)
            }
        }
    }
}
