use serde::{Deserialize, Serialize};

use crate::error::MonitorError;

/// 默认采样间隔 (毫秒)
pub const DEFAULT_INTERVAL_MS: i64 = 1000;

/// 监控配置，同时也是配置文件的持久化格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 要监控的进程名（精确匹配，区分大小写）
    #[serde(default)]
    pub process_name: String,
    /// 采样间隔 (毫秒)
    #[serde(default = "default_interval", rename = "interval")]
    pub interval_ms: i64,
}

fn default_interval() -> i64 {
    DEFAULT_INTERVAL_MS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            process_name: String::new(),
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl EngineConfig {
    pub fn new(process_name: impl Into<String>, interval_ms: i64) -> Self {
        Self {
            process_name: process_name.into(),
            interval_ms,
        }
    }

    /// 从界面输入的文本构造，间隔不是整数时返回校验错误
    pub fn from_input(process_name: &str, interval: &str) -> Result<Self, MonitorError> {
        let interval_ms = interval
            .trim()
            .parse::<i64>()
            .map_err(|_| MonitorError::Validation("Invalid interval value.".to_string()))?;
        Ok(Self::new(process_name, interval_ms))
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.interval_ms <= 0 {
            return Err(MonitorError::Validation(
                "Interval must be a positive number of milliseconds.".to_string(),
            ));
        }
        if self.process_name.is_empty() {
            return Err(MonitorError::Validation(
                "Please enter a process name.".to_string(),
            ));
        }
        Ok(())
    }

    /// 仅在 `validate` 通过后调用才有意义
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.interval_ms.max(1) as u64)
    }
}
