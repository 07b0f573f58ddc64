use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 每 MB 的字节数
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 一次读取得到的瞬时指标
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// CPU 使用率 (已按逻辑核数归一化，单核跑满约为 100)
    pub cpu_percent: f64,
    /// 常驻内存 (MB)
    pub memory_mb: f64,
}

impl Metrics {
    /// 由原始读数构造：`raw_cpu` 为未归一化的 CPU 百分比，`rss_bytes` 为常驻内存字节数
    pub fn from_raw(raw_cpu: f32, logical_cores: usize, rss_bytes: u64) -> Self {
        let cores = logical_cores.max(1) as f64;
        Self {
            cpu_percent: raw_cpu as f64 / cores,
            memory_mb: rss_bytes as f64 / BYTES_PER_MB,
        }
    }
}

/// 历史中的一条采样记录，创建后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    timestamp: DateTime<Utc>,
    cpu_percent: f64,
    memory_mb: f64,
}

impl Sample {
    /// 负值与 NaN 一律记为 0
    pub fn new(timestamp: DateTime<Utc>, metrics: Metrics) -> Self {
        Self {
            timestamp,
            cpu_percent: non_negative(metrics.cpu_percent),
            memory_mb: non_negative(metrics.memory_mb),
        }
    }

    pub fn now(metrics: Metrics) -> Self {
        Self::new(Utc::now(), metrics)
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn cpu_percent(&self) -> f64 {
        self.cpu_percent
    }

    pub fn memory_mb(&self) -> f64 {
        self.memory_mb
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() || value < 0.0 {
        0.0
    } else {
        value
    }
}
