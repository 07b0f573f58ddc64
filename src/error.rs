use thiserror::Error;

use crate::models::MonitorState;

/// 引擎对外暴露的错误
#[derive(Debug, Error)]
pub enum MonitorError {
    /// 启动参数不合法：不改变状态，只上报
    #[error("Error: {0}")]
    Validation(String),

    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: MonitorState,
        action: &'static str,
    },

    /// 会话中目标进程消失
    #[error("Process '{0}' stopped.")]
    ProcessLost(String),

    /// 权限、平台等意外错误，按进程丢失处理
    #[error("An error occurred: {0}")]
    Sampling(String),

    #[error("config error: {0}")]
    Config(anyhow::Error),

    #[error("export failed: {0}")]
    Export(anyhow::Error),
}

/// 采样时的失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// 在存活检查和读取之间进程退出了
    #[error("process is gone")]
    Gone,

    #[error("{0}")]
    Failed(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
