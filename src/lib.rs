//! Process Monitor: 按固定间隔采样指定进程的 CPU 与内存
//!
//! - [`services::ProcessLocator`] 按名字查找进程、校验存活、读取指标
//! - [`services::MonitorEngine`] 状态机、有界历史与失败处理
//! - [`api`] HTTP 控制接口，[`metrics`] Prometheus 指标

pub mod api;
pub mod cli;
pub mod error;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

pub use error::{MonitorError, SampleError};
pub use models::{EngineConfig, Metrics, MonitorState, ProcessHandle, Sample};
pub use services::{MonitorEngine, TickOutcome};
pub use state::{new_state, AppState};
