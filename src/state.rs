use crate::services::{MonitorEngine, TickScheduler};
use std::sync::{Arc, Mutex, MutexGuard};

/// 引擎状态、历史和目标都在这一把锁后面，tick 和控制操作互斥执行
pub struct AppStateInner {
    pub engine: MonitorEngine,
    pub scheduler: TickScheduler,
}

pub type AppState = Arc<Mutex<AppStateInner>>;

pub fn new_state(engine: MonitorEngine) -> AppState {
    Arc::new(Mutex::new(AppStateInner {
        engine,
        scheduler: TickScheduler::new(),
    }))
}

/// 持锁方 panic 后锁会中毒，这里直接取回内部数据继续使用
pub fn lock_state(state: &AppState) -> MutexGuard<'_, AppStateInner> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
