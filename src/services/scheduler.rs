use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::{MonitorEngine, TickOutcome};
use crate::state::{lock_state, AppState};

/// 周期性驱动 `MonitorEngine::tick` 的定时任务
///
/// 每个 Running 会话对应一个 tokio 任务；暂停、停止、重置后任务退出，
/// 恢复或重新启动时按新会话重新创建
#[derive(Default)]
pub struct TickScheduler {
    task: Option<(u64, JoinHandle<()>)>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self { task: None }
    }

    /// 当前是否有活动的定时任务
    pub fn is_scheduled(&self) -> bool {
        matches!(&self.task, Some((_, handle)) if !handle.is_finished())
    }

    /// 让定时任务与引擎状态保持一致，调用方需持有状态锁
    ///
    /// 必须在 tokio 运行时内调用
    pub fn sync(&mut self, engine: &MonitorEngine, state: &AppState) {
        if !engine.is_running() {
            self.cancel();
            return;
        }

        let session = engine.session();
        if let Some((current, handle)) = &self.task {
            if *current == session && !handle.is_finished() {
                return;
            }
        }

        self.cancel();
        let period = engine.interval();
        log::debug!("Scheduling tick every {:?} (session {})", period, session);
        let handle = tokio::spawn(run_ticks(state.clone(), session, period));
        self.task = Some((session, handle));
    }

    pub fn cancel(&mut self) {
        if let Some((session, handle)) = self.task.take() {
            log::debug!("Cancelling tick task (session {})", session);
            handle.abort();
        }
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// 锁内执行 tick，慢的 tick 会推迟下一次，不会重叠
async fn run_ticks(state: AppState, session: u64, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // 第一次 tick 立即完成，首次采样放在一个间隔之后
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let mut inner = lock_state(&state);
        if inner.engine.session() != session || !inner.engine.is_running() {
            break;
        }
        if let TickOutcome::Stopped { reason } = inner.engine.tick() {
            log::info!("Tick task finished: {}", reason);
            break;
        }
    }
}
