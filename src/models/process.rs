use serde::Serialize;
use std::fmt;

/// 已解析到的某个具体进程实例
///
/// `start_time` 与 pid 一起标识实例，pid 被复用时可据此识别出不是同一个进程
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessHandle {
    pub pid: u32,
    pub start_time: u64,
    pub name: String,
}

/// 监控目标：进程名 + 可能失效的句柄，每次使用前都要重新校验存活
#[derive(Debug, Clone, Default)]
pub struct MonitorTarget {
    pub process_name: String,
    pub handle: Option<ProcessHandle>,
}

impl MonitorTarget {
    pub fn new(process_name: impl Into<String>) -> Self {
        Self {
            process_name: process_name.into(),
            handle: None,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.handle.as_ref().map(|h| h.pid)
    }
}

/// 引擎状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonitorState {
    Idle,
    Running,
    Paused,
    Stopped,
}

impl MonitorState {
    /// Prometheus 中使用的数值编码
    pub fn as_gauge(self) -> f64 {
        match self {
            MonitorState::Idle => 0.0,
            MonitorState::Running => 1.0,
            MonitorState::Paused => 2.0,
            MonitorState::Stopped => 3.0,
        }
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MonitorState::Idle => "idle",
            MonitorState::Running => "running",
            MonitorState::Paused => "paused",
            MonitorState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
