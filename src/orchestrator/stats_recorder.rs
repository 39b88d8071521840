//! 共享统计
//!
//! 所有并发任务通过同一把互斥锁更新计数，读取方在同一把锁下复制快照，不会读到半更新状态

use crate::models::StatsSnapshot;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct StatsState {
    snapshot: StatsSnapshot,
    /// 成功记录的累计耗时，用于计算平均值
    busy_total: Duration,
}

/// 处理统计记录器
#[derive(Debug, Default)]
pub struct StatsRecorder {
    state: Mutex<StatsState>,
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条成功处理
    pub fn record_success(&self, elapsed: Duration) {
        let mut state = self.lock();
        state.busy_total += elapsed;
        state.snapshot.total_processed += 1;
        state.snapshot.last_duration = elapsed;
        state.snapshot.average_duration = average(state.busy_total, state.snapshot.total_processed);
    }

    /// 记录一条失败处理
    pub fn record_failure(&self, elapsed: Duration) {
        let mut state = self.lock();
        state.snapshot.errors += 1;
        state.snapshot.last_duration = elapsed;
    }

    /// 记录因取消而未完成的记录
    pub fn record_cancelled(&self, count: u64) {
        self.lock().snapshot.cancelled += count;
    }

    /// 当前统计的一致快照
    pub fn snapshot(&self) -> StatsSnapshot {
        self.lock().snapshot
    }

    // 计数在任何一步更新中都不会 panic，锁中毒时继续使用内部数据
    fn lock(&self) -> MutexGuard<'_, StatsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn average(total: Duration, count: u64) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = total.as_nanos() / u128::from(count);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_new_recorder_is_zeroed() {
        assert_eq!(StatsRecorder::new().snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn test_last_and_average_duration_differ() {
        let recorder = StatsRecorder::new();
        recorder.record_success(Duration::from_millis(100));
        recorder.record_success(Duration::from_millis(300));

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.total_processed, 2);
        assert_eq!(snapshot.last_duration, Duration::from_millis(300));
        assert_eq!(snapshot.average_duration, Duration::from_millis(200));
    }

    #[test]
    fn test_failure_does_not_touch_processed() {
        let recorder = StatsRecorder::new();
        recorder.record_success(Duration::from_millis(10));
        recorder.record_failure(Duration::from_millis(50));
        recorder.record_cancelled(2);

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.total_processed, 1);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.cancelled, 2);
        assert_eq!(snapshot.average_duration, Duration::from_millis(10));
        assert_eq!(snapshot.last_duration, Duration::from_millis(50));
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let recorder = Arc::new(StatsRecorder::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let recorder = Arc::clone(&recorder);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        recorder.record_success(Duration::from_micros(1));
                    }
                })
            })
            .collect();

        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(recorder.snapshot().total_processed, 8000);
    }
}
