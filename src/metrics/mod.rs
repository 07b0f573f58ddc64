use lazy_static::lazy_static;
use prometheus::{
    register_gauge_vec_with_registry, register_gauge_with_registry, Encoder, Gauge, GaugeVec,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::services::MonitorEngine;

pub struct MetricsRegistry {
    registry: Registry,

    pub monitor_state: Gauge,
    pub history_samples: Gauge,
    pub process_pid: GaugeVec,
    pub process_cpu_percent: GaugeVec,
    pub process_memory_mb: GaugeVec,
}

impl MetricsRegistry {
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();
        let labels = &["name"];

        let monitor_state = register_gauge_with_registry!(
            Opts::new(
                "process_monitor_state",
                "Engine state (0=idle, 1=running, 2=paused, 3=stopped)"
            ),
            registry
        )?;

        let history_samples = register_gauge_with_registry!(
            Opts::new("process_monitor_history_samples", "Samples currently retained"),
            registry
        )?;

        let process_pid = register_gauge_vec_with_registry!(
            Opts::new("process_monitor_target_pid", "PID of the monitored process"),
            labels,
            registry
        )?;

        let process_cpu_percent = register_gauge_vec_with_registry!(
            Opts::new(
                "process_monitor_cpu_percent",
                "Latest CPU usage, normalized by logical cores"
            ),
            labels,
            registry
        )?;

        let process_memory_mb = register_gauge_vec_with_registry!(
            Opts::new("process_monitor_memory_mb", "Latest resident memory in MB"),
            labels,
            registry
        )?;

        Ok(Self {
            registry,
            monitor_state,
            history_samples,
            process_pid,
            process_cpu_percent,
            process_memory_mb,
        })
    }

    /// 抓取时按引擎快照刷新
    pub fn observe(&self, engine: &MonitorEngine) {
        self.monitor_state.set(engine.state().as_gauge());
        self.history_samples.set(engine.history().len() as f64);

        // 进程名可能变了，旧的标签全部清掉
        self.process_pid.reset();
        self.process_cpu_percent.reset();
        self.process_memory_mb.reset();

        let name = engine.target().process_name.as_str();
        if name.is_empty() {
            return;
        }

        if let Some(pid) = engine.target().pid() {
            self.process_pid.with_label_values(&[name]).set(pid as f64);
        }

        if let Some(latest) = engine.history().latest() {
            self.process_cpu_percent
                .with_label_values(&[name])
                .set(latest.cpu_percent());
            self.process_memory_mb
                .with_label_values(&[name])
                .set(latest.memory_mb());
        }
    }

    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

lazy_static! {
    pub static ref METRICS: Arc<MetricsRegistry> =
        Arc::new(MetricsRegistry::new().expect("metric definitions are valid"));
}
