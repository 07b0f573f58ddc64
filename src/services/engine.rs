use std::time::Duration;

use crate::error::{MonitorError, Result, SampleError};
use crate::models::{EngineConfig, MonitorState, MonitorTarget, Sample};
use crate::services::config_store::ConfigStore;
use crate::services::history::History;
use crate::services::process_locator::ProcessLocator;
use crate::services::report_exporter::ChartExporter;
use crate::services::status::StatusReporter;

/// 引擎依赖的外部协作者
pub struct Collaborators {
    pub locator: Box<dyn ProcessLocator>,
    pub config_store: Box<dyn ConfigStore>,
    pub reporter: Box<dyn StatusReporter>,
    pub exporter: Box<dyn ChartExporter>,
}

/// 一次 tick 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// 不在 Running 状态，什么都没做
    Skipped,
    /// 目标进程还没出现
    Waiting,
    /// 记录了一条采样
    Sampled,
    /// 目标丢失或采样出错，引擎已转为 Stopped
    Stopped { reason: String },
}

/// 采样引擎：状态机 + 目标进程 + 有界历史
///
/// 引擎本身不持有定时器，宿主按 `interval()` 周期调用 `tick()`。
/// 每次进入 Running 时 `session()` 递增，定时任务据此判断自己是否已过期。
pub struct MonitorEngine {
    state: MonitorState,
    config: EngineConfig,
    target: MonitorTarget,
    history: History,
    session: u64,
    last_status: String,
    collaborators: Collaborators,
}

const NOT_MONITORING: &str = "Status: Not monitoring";

impl MonitorEngine {
    pub fn new(collaborators: Collaborators) -> Self {
        Self::with_history(collaborators, History::new())
    }

    pub fn with_history(collaborators: Collaborators, history: History) -> Self {
        let config = collaborators.config_store.load();
        log::debug!("Loaded config: {:?}", config);

        Self {
            state: MonitorState::Idle,
            config,
            target: MonitorTarget::default(),
            history,
            session: 0,
            last_status: NOT_MONITORING.to_string(),
            collaborators,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// 当前配置：Idle 时是从配置文件加载的默认值，之后是最近一次成功启动的配置
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn target(&self) -> &MonitorTarget {
        &self.target
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn interval(&self) -> Duration {
        self.config.interval()
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn last_status(&self) -> &str {
        &self.last_status
    }

    pub fn is_running(&self) -> bool {
        self.state == MonitorState::Running
    }

    /// Idle -> Running
    pub fn start(&mut self, config: EngineConfig) -> Result<()> {
        if self.state != MonitorState::Idle {
            return Err(self.reject("start"));
        }

        if let Err(e) = config.validate() {
            log::warn!("Rejected config {:?}: {}", config, e);
            self.report(e.to_string());
            return Err(e);
        }

        // 保存失败不影响本次启动
        if let Err(e) = self.collaborators.config_store.save(&config) {
            log::warn!("{:#}", MonitorError::Config(e));
        }

        log::info!(
            "Start monitoring '{}' every {} ms",
            config.process_name,
            config.interval_ms
        );
        self.target = MonitorTarget::new(config.process_name.clone());
        self.config = config;
        self.enter_running();
        Ok(())
    }

    /// 以界面上的原始输入启动，间隔文本无法解析时同样按校验错误处理
    pub fn start_from_input(&mut self, process_name: &str, interval: &str) -> Result<()> {
        if self.state != MonitorState::Idle {
            return Err(self.reject("start"));
        }

        match EngineConfig::from_input(process_name, interval) {
            Ok(config) => self.start(config),
            Err(e) => {
                log::warn!("Rejected interval input '{}'", interval);
                self.report(e.to_string());
                Err(e)
            }
        }
    }

    /// Running -> Paused，保留历史和目标
    pub fn pause(&mut self) -> Result<()> {
        if self.state != MonitorState::Running {
            return Err(self.reject("pause"));
        }
        self.state = MonitorState::Paused;
        self.report("Monitoring paused");
        Ok(())
    }

    /// Paused -> Running，沿用上次的间隔
    pub fn resume(&mut self) -> Result<()> {
        if self.state != MonitorState::Paused {
            return Err(self.reject("resume"));
        }
        self.enter_running();
        Ok(())
    }

    /// 播放/暂停按钮：Running 暂停，Paused 恢复，Idle 用当前配置启动
    pub fn toggle(&mut self) -> Result<()> {
        match self.state {
            MonitorState::Running => self.pause(),
            MonitorState::Paused => self.resume(),
            MonitorState::Idle => self.start(self.config.clone()),
            MonitorState::Stopped => Err(self.reject("toggle")),
        }
    }

    /// Running/Paused -> Stopped，历史非空时导出
    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            MonitorState::Running | MonitorState::Paused => {
                self.report("Monitoring stopped");
                self.finish();
                Ok(())
            }
            _ => Err(self.reject("stop")),
        }
    }

    /// 任意状态 -> Idle：清空历史和目标，重新加载配置
    pub fn reset(&mut self) {
        log::info!("Reset from {}", self.state);
        self.state = MonitorState::Idle;
        self.history.clear();
        self.target = MonitorTarget::default();
        self.config = self.collaborators.config_store.load();
        self.report(NOT_MONITORING);
    }

    /// 一次采样。所有失败都在这里消化为状态上报和状态转移，不向外抛出
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != MonitorState::Running {
            return TickOutcome::Skipped;
        }

        let alive = match &self.target.handle {
            Some(handle) => self.collaborators.locator.is_alive(handle),
            None => false,
        };

        if !alive {
            // 失效的句柄先丢掉，保证不会对它调用 sample
            if let Some(old) = self.target.handle.take() {
                log::debug!("Handle for PID {} is no longer alive", old.pid);
            }

            match self.collaborators.locator.find(&self.target.process_name) {
                Some(handle) => {
                    log::info!(
                        "✓ Attached to '{}' (PID {})",
                        self.target.process_name,
                        handle.pid
                    );
                    self.target.handle = Some(handle);
                }
                None => {
                    let text = format!(
                        "Waiting for process '{}' to start...",
                        self.target.process_name
                    );
                    self.report(text);
                    return TickOutcome::Waiting;
                }
            }
        }

        let Some(handle) = self.target.handle.clone() else {
            return TickOutcome::Waiting;
        };

        match self.collaborators.locator.sample(&handle) {
            Ok(metrics) => {
                let sample = Sample::now(metrics);
                log::debug!(
                    "PID {}: cpu={:.2}% mem={:.2}MB",
                    handle.pid,
                    sample.cpu_percent(),
                    sample.memory_mb()
                );
                self.history.push(sample);
                self.report(monitoring_text(&self.target.process_name));
                TickOutcome::Sampled
            }
            Err(SampleError::Gone) => {
                let name = self.target.process_name.clone();
                self.lose(MonitorError::ProcessLost(name))
            }
            Err(SampleError::Failed(e)) => self.lose(MonitorError::Sampling(e)),
        }
    }

    fn enter_running(&mut self) {
        self.state = MonitorState::Running;
        self.session = self.session.wrapping_add(1);
        self.report(monitoring_text(&self.config.process_name));
    }

    /// 会话中丢失目标：上报后自动停止
    fn lose(&mut self, err: MonitorError) -> TickOutcome {
        let reason = err.to_string();
        log::warn!("{}", reason);
        self.target.handle = None;
        self.report(reason.clone());
        self.finish();
        TickOutcome::Stopped { reason }
    }

    /// 进入 Stopped 并导出历史。只会从 Running/Paused 调用，所以每个会话最多导出一次
    fn finish(&mut self) {
        self.state = MonitorState::Stopped;

        if self.history.is_empty() {
            log::info!("No samples collected, skipping export");
            return;
        }

        let result = self
            .collaborators
            .exporter
            .export(&self.target.process_name, self.history.samples());

        match result {
            Ok(filename) => self.report(format!("Chart saved as {}", filename)),
            Err(e) => {
                let err = MonitorError::Export(e);
                log::error!("{:#}", err);
                self.report(format!("Error: {}", err));
            }
        }
    }

    fn reject(&mut self, action: &'static str) -> MonitorError {
        let err = MonitorError::InvalidTransition {
            state: self.state,
            action,
        };
        log::warn!("{}", err);
        self.report(format!("Error: {}", err));
        err
    }

    fn report(&mut self, text: impl Into<String>) {
        self.last_status = text.into();
        self.collaborators.reporter.report_status(&self.last_status);
    }
}

fn monitoring_text(process_name: &str) -> String {
    format!("Monitoring process '{}'...", process_name)
}
