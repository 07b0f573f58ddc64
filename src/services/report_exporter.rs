use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::models::Sample;

/// 停止监控时接收完整历史的一方，返回生成的文件名
pub trait ChartExporter: Send {
    fn export(&mut self, process_name: &str, history: &[Sample]) -> anyhow::Result<String>;
}

/// 导出文件内容：绘图所需的序列和坐标轴范围
#[derive(Debug, Serialize)]
pub struct ChartReport<'a> {
    pub process_name: &'a str,
    pub generated_at: DateTime<Utc>,
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub cpu_max: f64,
    pub memory_max: f64,
    pub samples: &'a [Sample],
}

impl<'a> ChartReport<'a> {
    /// `samples` 为空时返回 None
    pub fn build(process_name: &'a str, samples: &'a [Sample]) -> Option<Self> {
        let first = samples.first()?;
        let (mut time_min, mut time_max) = (first.timestamp(), first.timestamp());
        let (mut cpu_max, mut memory_max) = (0.0_f64, 0.0_f64);

        for s in samples {
            time_min = time_min.min(s.timestamp());
            time_max = time_max.max(s.timestamp());
            cpu_max = cpu_max.max(s.cpu_percent());
            memory_max = memory_max.max(s.memory_mb());
        }

        Some(Self {
            process_name,
            generated_at: Utc::now(),
            time_min,
            time_max,
            cpu_max,
            memory_max,
            samples,
        })
    }
}

/// 写到 `report_dir/process_monitor_chart_YYYYmmdd-HHMMSS.json`
pub struct JsonReportExporter {
    report_dir: PathBuf,
}

impl JsonReportExporter {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    fn file_name() -> String {
        format!(
            "process_monitor_chart_{}.json",
            Local::now().format("%Y%m%d-%H%M%S")
        )
    }
}

impl ChartExporter for JsonReportExporter {
    fn export(&mut self, process_name: &str, history: &[Sample]) -> anyhow::Result<String> {
        let report = ChartReport::build(process_name, history)
            .ok_or_else(|| anyhow::anyhow!("No data to export"))?;

        std::fs::create_dir_all(&self.report_dir)
            .with_context(|| format!("Failed to create {}", self.report_dir.display()))?;

        let filename = Self::file_name();
        let path = self.report_dir.join(&filename);
        let data = serde_json::to_vec_pretty(&report)?;
        std::fs::write(&path, data)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        log::info!("✓ Exported {} samples to {}", history.len(), path.display());
        Ok(filename)
    }
}
