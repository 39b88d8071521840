//! 批处理器 - 编排层
//!
//! ## 职责
//!
//! 接收一批记录，为每条记录启动独立的 tokio 任务并发执行转换步骤，
//! 等全部任务结束后按输入顺序返回结果。
//!
//! ## 核心功能
//!
//! 1. **并发控制**：使用 Semaphore 限制同时运行的任务数
//! 2. **顺序保证**：结果按下标写入预分配的槽位，与完成顺序无关
//! 3. **失败隔离**：单条记录失败或 panic 只影响自己的槽位
//! 4. **取消**：收到取消信号后不再启动新任务，进行中的任务尽快退出
//! 5. **统计**：每条记录结束后在锁内更新共享统计

use crate::error::{AppResult, ProcessError};
use crate::models::{BatchReport, ProcessOutcome, StatsSnapshot, WorkItem};
use crate::orchestrator::stats_recorder::StatsRecorder;
use crate::utils::logging::{log_batch_complete, log_batch_start};
use crate::workflow::Transform;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

/// 默认并发上限：处理步骤以等待为主，不按 CPU 核心数限制
pub const DEFAULT_MAX_CONCURRENCY: usize = 100;

/// 并发批处理器
pub struct BatchProcessor<T> {
    transform: Arc<dyn Transform<T>>,
    max_concurrency: usize,
    stats: Arc<StatsRecorder>,
}

impl<T: WorkItem> BatchProcessor<T> {
    /// 创建处理器，统计清零，并发上限默认为 `DEFAULT_MAX_CONCURRENCY`
    pub fn new(transform: impl Transform<T>) -> Self {
        Self {
            transform: Arc::new(transform),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            stats: Arc::new(StatsRecorder::new()),
        }
    }

    /// 设置并发上限，限制在 `1..=Semaphore::MAX_PERMITS`
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// 当前统计快照，可在批次进行中随时调用
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// 处理一批记录，返回与输入等长、同序的结果
    pub async fn process_batch(&self, items: Vec<T>) -> AppResult<Vec<ProcessOutcome<T>>> {
        let report = self
            .process_batch_with_cancel(items, CancellationToken::new())
            .await?;
        Ok(report.outcomes)
    }

    /// 处理一批记录，支持取消
    ///
    /// 取消后未启动和被中断的记录以 `ProcessOutcome::Cancelled` 返回，调用不会挂起
    pub async fn process_batch_with_cancel(
        &self,
        items: Vec<T>,
        token: CancellationToken,
    ) -> AppResult<BatchReport<T>> {
        if items.is_empty() {
            return Ok(BatchReport {
                outcomes: Vec::new(),
                cancelled: false,
            });
        }

        let total = items.len();
        log_batch_start(total, self.max_concurrency);

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let ids: Vec<String> = items.iter().map(|item| item.id().to_owned()).collect();
        let mut slots: Vec<Option<ProcessOutcome<T>>> = (0..total).map(|_| None).collect();
        let mut handles = Vec::with_capacity(total);
        let mut skipped = 0u64;

        // 为每条记录创建并发任务
        for (index, item) in items.into_iter().enumerate() {
            let acquired = tokio::select! {
                biased;
                _ = token.cancelled() => None,
                permit = semaphore.clone().acquire_owned() => Some(permit),
            };

            let permit = match acquired {
                Some(permit) => permit?,
                None => {
                    slots[index] = Some(ProcessOutcome::Cancelled {
                        id: item.id().to_owned(),
                    });
                    skipped += 1;
                    continue;
                }
            };

            let transform = Arc::clone(&self.transform);
            let stats = Arc::clone(&self.stats);
            let token = token.clone();
            let handle = tokio::spawn(async move {
                let _permit = permit;
                run_item(transform, stats, token, item).await
            });
            handles.push((index, handle));
        }

        if skipped > 0 {
            self.stats.record_cancelled(skipped);
            warn!("⚠️ 批次已取消，{} 条记录未启动", skipped);
        }

        // 等待所有任务完成，按下标写回
        for (index, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    let id = ids[index].clone();
                    error!("[记录 {}] 任务执行失败: {}", id, e);
                    self.stats.record_failure(std::time::Duration::ZERO);
                    ProcessOutcome::Failed {
                        id: id.clone(),
                        error: ProcessError::Panicked {
                            id,
                            message: e.to_string(),
                        },
                    }
                }
            };
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<ProcessOutcome<T>> = slots
            .into_iter()
            .zip(ids)
            .map(|(slot, id)| slot.unwrap_or(ProcessOutcome::Cancelled { id }))
            .collect();

        let report = BatchReport {
            outcomes,
            cancelled: token.is_cancelled(),
        };
        log_batch_complete(
            report.completed_count(),
            report.failed_count(),
            report.cancelled_count(),
            total,
        );

        Ok(report)
    }
}

/// 在独立任务中处理单条记录并更新统计
async fn run_item<T: WorkItem>(
    transform: Arc<dyn Transform<T>>,
    stats: Arc<StatsRecorder>,
    token: CancellationToken,
    item: T,
) -> ProcessOutcome<T> {
    let id = item.id().to_owned();
    let start = Instant::now();
    let work = AssertUnwindSafe(async move { transform.apply(item).await }).catch_unwind();

    let result = tokio::select! {
        biased;
        _ = token.cancelled() => {
            stats.record_cancelled(1);
            debug!("[记录 {}] 已取消", id);
            return ProcessOutcome::Cancelled { id };
        }
        result = work => result,
    };

    let elapsed = start.elapsed();
    match result {
        Ok(Ok(item)) => {
            stats.record_success(elapsed);
            debug!("[记录 {}] ✓ 处理完成，耗时 {:?}", id, elapsed);
            ProcessOutcome::Completed(item)
        }
        Ok(Err(error)) => {
            stats.record_failure(elapsed);
            warn!("[记录 {}] ❌ {}", id, error);
            ProcessOutcome::Failed { id, error }
        }
        Err(panic) => {
            // panic! 的负载通常是 &str 或 String
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "未知的 panic 负载".to_string());
            stats.record_failure(elapsed);
            error!("[记录 {}] ❌ 处理时发生 panic: {}", id, message);
            ProcessOutcome::Failed {
                id: id.clone(),
                error: ProcessError::Panicked { id, message },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, AppointmentStatus};
    use crate::workflow::{transform_fn, ConfirmAppointment};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Job {
        id: String,
        delay_ms: u64,
    }

    impl WorkItem for Job {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn job(id: &str, delay_ms: u64) -> Job {
        Job {
            id: id.to_string(),
            delay_ms,
        }
    }

    fn sleeping_processor() -> BatchProcessor<Job> {
        BatchProcessor::new(transform_fn(|job: Job| async move {
            tokio::time::sleep(Duration::from_millis(job.delay_ms)).await;
            Ok(job)
        }))
    }

    #[tokio::test]
    async fn test_example_batch_is_confirmed() {
        let processor = BatchProcessor::new(ConfirmAppointment::new(Duration::ZERO));
        let start = Utc::now();
        let items: Vec<Appointment> = ["a", "b", "c"]
            .iter()
            .map(|id| Appointment {
                id: id.to_string(),
                ..Appointment::new("Alice Johnson", "Oil Change", start)
            })
            .collect();

        let outcomes = processor.process_batch(items).await.unwrap();

        assert_eq!(outcomes.len(), 3);
        for (outcome, expected) in outcomes.iter().zip(["a", "b", "c"]) {
            let apt = outcome.as_completed().unwrap();
            assert_eq!(apt.id, expected);
            assert_eq!(apt.status, AppointmentStatus::Confirmed);
            assert!(apt.processed_at.unwrap() >= start);
        }
        assert_eq!(processor.stats().total_processed, 3);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let processor = BatchProcessor::new(transform_fn(move |job: Job| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(job) }
        }));

        let outcomes = processor.process_batch(Vec::new()).await.unwrap();

        assert!(outcomes.is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(processor.stats(), StatsSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved_under_reverse_completion() {
        let processor = sleeping_processor().with_max_concurrency(3);
        let items = vec![job("slow", 300), job("medium", 200), job("fast", 100)];
        let start = tokio::time::Instant::now();

        let outcomes = processor.process_batch(items).await.unwrap();

        let ids: Vec<&str> = outcomes.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec!["slow", "medium", "fast"]);
        assert!(processor.stats().last_duration >= Duration::from_millis(300));
        // 三条并行执行，总耗时取决于最慢的一条
        assert!(start.elapsed() < Duration::from_millis(600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_cap_is_respected() {
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (active_c, peak_c) = (active.clone(), peak.clone());
        let processor = BatchProcessor::new(transform_fn(move |job: Job| {
            let active = active_c.clone();
            let peak = peak_c.clone();
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok(job)
            }
        }))
        .with_max_concurrency(2);

        let items = (0..10).map(|i| job(&i.to_string(), 0)).collect();
        let outcomes = processor.process_batch(items).await.unwrap();

        assert_eq!(outcomes.len(), 10);
        assert!(outcomes.iter().all(ProcessOutcome::is_completed));
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failures_are_contained() {
        let processor = BatchProcessor::new(transform_fn(|job: Job| async move {
            if job.id.starts_with("bad") {
                Err(ProcessError::transformation_failed(job.id, "rejected"))
            } else {
                Ok(job)
            }
        }));
        let items = vec![job("ok-1", 0), job("bad-1", 0), job("ok-2", 0), job("bad-2", 0)];

        let outcomes = processor.process_batch(items).await.unwrap();
        let stats = processor.stats();

        assert_eq!(stats.total_processed + stats.errors, 4);
        assert_eq!(stats.errors, 2);
        let failed: Vec<&str> = outcomes.iter().filter(|o| o.is_failed()).map(|o| o.id()).collect();
        assert_eq!(failed, vec!["bad-1", "bad-2"]);
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let processor = BatchProcessor::new(transform_fn(|job: Job| async move {
            if job.id == "boom" {
                panic!("transform exploded");
            }
            if job.id == "boom-owned" {
                panic!("transform exploded on {}", job.id);
            }
            Ok(job)
        }));

        let outcomes = processor
            .process_batch(vec![job("a", 0), job("boom", 0), job("c", 0), job("boom-owned", 0)])
            .await
            .unwrap();

        match &outcomes[1] {
            ProcessOutcome::Failed {
                id,
                error: ProcessError::Panicked { message, .. },
            } => {
                assert_eq!(id, "boom");
                assert_eq!(message, "transform exploded");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        match &outcomes[3] {
            ProcessOutcome::Failed {
                error: ProcessError::Panicked { message, .. },
                ..
            } => assert_eq!(message, "transform exploded on boom-owned"),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(outcomes[0].is_completed());
        assert!(outcomes[2].is_completed());
        assert_eq!(processor.stats().errors, 2);
        assert_eq!(processor.stats().total_processed, 2);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let processor = sleeping_processor();
        let token = CancellationToken::new();
        token.cancel();

        let report = processor
            .process_batch_with_cancel(vec![job("a", 0), job("b", 0)], token)
            .await
            .unwrap();

        assert!(report.is_partial());
        assert_eq!(report.cancelled_count(), 2);
        assert_eq!(report.outcomes[1].id(), "b");
        assert_eq!(processor.stats().cancelled, 2);
        assert_eq!(processor.stats().total_processed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_in_flight_items() {
        let processor = sleeping_processor().with_max_concurrency(1);
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(150)).await;
            trigger.cancel();
        });

        let items = vec![job("a", 100), job("b", 100), job("c", 100)];
        let report = processor.process_batch_with_cancel(items, token).await.unwrap();

        assert!(report.cancelled);
        assert!(report.outcomes[0].is_completed());
        assert!(report.outcomes[1].is_cancelled());
        assert!(report.outcomes[2].is_cancelled());
        assert_eq!(processor.stats().total_processed, 1);
        assert_eq!(processor.stats().cancelled, 2);
    }

    #[tokio::test]
    async fn test_oversized_concurrency_is_clamped() {
        let processor = BatchProcessor::new(ConfirmAppointment::new(Duration::ZERO))
            .with_max_concurrency(usize::MAX);
        assert_eq!(processor.max_concurrency(), Semaphore::MAX_PERMITS);

        let apt = Appointment::new("Alice Johnson", "Oil Change", Utc::now());
        let outcomes = processor.process_batch(vec![apt]).await.unwrap();

        assert!(outcomes[0].is_completed());
        assert_eq!(BatchProcessor::new(ConfirmAppointment::new(Duration::ZERO)).with_max_concurrency(0).max_concurrency(), 1);
    }

    #[test]
    fn test_default_concurrency_is_fixed() {
        let processor = BatchProcessor::new(ConfirmAppointment::new(Duration::ZERO));
        assert_eq!(processor.max_concurrency(), DEFAULT_MAX_CONCURRENCY);
    }
}
