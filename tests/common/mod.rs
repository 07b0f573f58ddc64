//! 集成测试共用的脚本化协作者
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use process_monitor::services::{
    ChartExporter, Collaborators, ConfigStore, History, MonitorEngine, ProcessLocator,
    StatusReporter,
};
use process_monitor::{EngineConfig, Metrics, ProcessHandle, Sample, SampleError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Find(String),
    IsAlive(u32),
    Sample(u32),
}

#[derive(Default)]
struct Shared {
    calls: Vec<Call>,
    statuses: Vec<String>,
    exports: Vec<Vec<Sample>>,
    saved: Vec<EngineConfig>,
    stored: EngineConfig,
    fail_export: bool,
    fail_save: bool,
}

/// 记录各个假实现观察到的调用，协作者交给引擎后仍可读取
#[derive(Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Shared>>,
}

impl Recorder {
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.inner.lock().unwrap().statuses.clone()
    }

    pub fn exports(&self) -> Vec<Vec<Sample>> {
        self.inner.lock().unwrap().exports.clone()
    }

    pub fn saved(&self) -> Vec<EngineConfig> {
        self.inner.lock().unwrap().saved.clone()
    }

    pub fn set_stored(&self, config: EngineConfig) {
        self.inner.lock().unwrap().stored = config;
    }

    pub fn fail_exports(&self) {
        self.inner.lock().unwrap().fail_export = true;
    }

    pub fn fail_saves(&self) {
        self.inner.lock().unwrap().fail_save = true;
    }

    pub fn clear_statuses(&self) {
        self.inner.lock().unwrap().statuses.clear();
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

pub fn handle(pid: u32, name: &str) -> ProcessHandle {
    ProcessHandle {
        pid,
        start_time: 1_700_000_000,
        name: name.to_string(),
    }
}

pub fn metrics(cpu: f64, mem: f64) -> Metrics {
    Metrics {
        cpu_percent: cpu,
        memory_mb: mem,
    }
}

/// 按队列依次应答的 locator，队列用完后返回默认值
pub struct ScriptedLocator {
    recorder: Recorder,
    finds: VecDeque<Option<ProcessHandle>>,
    default_find: Option<ProcessHandle>,
    alive: VecDeque<bool>,
    samples: VecDeque<Result<Metrics, SampleError>>,
    default_sample: Result<Metrics, SampleError>,
}

impl ScriptedLocator {
    pub fn new(recorder: &Recorder) -> Self {
        Self {
            recorder: recorder.clone(),
            finds: VecDeque::new(),
            default_find: None,
            alive: VecDeque::new(),
            samples: VecDeque::new(),
            default_sample: Ok(metrics(12.5, 50.0)),
        }
    }

    /// 每次 `find` 都返回 `handle`
    pub fn always_finds(mut self, handle: ProcessHandle) -> Self {
        self.default_find = Some(handle);
        self
    }

    pub fn then_find(mut self, result: Option<ProcessHandle>) -> Self {
        self.finds.push_back(result);
        self
    }

    pub fn then_alive(mut self, alive: bool) -> Self {
        self.alive.push_back(alive);
        self
    }

    pub fn then_sample(mut self, result: Result<Metrics, SampleError>) -> Self {
        self.samples.push_back(result);
        self
    }

    pub fn default_sample(mut self, result: Result<Metrics, SampleError>) -> Self {
        self.default_sample = result;
        self
    }
}

impl ProcessLocator for ScriptedLocator {
    fn find(&mut self, name: &str) -> Option<ProcessHandle> {
        self.recorder.record(Call::Find(name.to_string()));
        match self.finds.pop_front() {
            Some(result) => result,
            None => self.default_find.clone(),
        }
    }

    fn is_alive(&mut self, handle: &ProcessHandle) -> bool {
        self.recorder.record(Call::IsAlive(handle.pid));
        self.alive.pop_front().unwrap_or(true)
    }

    fn sample(&mut self, handle: &ProcessHandle) -> Result<Metrics, SampleError> {
        self.recorder.record(Call::Sample(handle.pid));
        match self.samples.pop_front() {
            Some(result) => result,
            None => self.default_sample.clone(),
        }
    }
}

struct FakeStore(Recorder);

impl ConfigStore for FakeStore {
    fn load(&self) -> EngineConfig {
        self.0.inner.lock().unwrap().stored.clone()
    }

    fn save(&self, config: &EngineConfig) -> anyhow::Result<()> {
        let mut inner = self.0.inner.lock().unwrap();
        if inner.fail_save {
            anyhow::bail!("read-only filesystem");
        }
        inner.saved.push(config.clone());
        inner.stored = config.clone();
        Ok(())
    }
}

struct FakeReporter(Recorder);

impl StatusReporter for FakeReporter {
    fn report_status(&mut self, text: &str) {
        self.0.inner.lock().unwrap().statuses.push(text.to_string());
    }
}

struct FakeExporter(Recorder);

impl ChartExporter for FakeExporter {
    fn export(&mut self, _process_name: &str, history: &[Sample]) -> anyhow::Result<String> {
        let mut inner = self.0.inner.lock().unwrap();
        inner.exports.push(history.to_vec());
        if inner.fail_export {
            anyhow::bail!("disk full");
        }
        Ok(format!("chart_{}.json", inner.exports.len()))
    }
}

pub fn engine_with(locator: ScriptedLocator, recorder: &Recorder) -> MonitorEngine {
    engine_with_capacity(locator, recorder, process_monitor::services::MAX_SAMPLES)
}

pub fn engine_with_capacity(
    locator: ScriptedLocator,
    recorder: &Recorder,
    capacity: usize,
) -> MonitorEngine {
    let collaborators = Collaborators {
        locator: Box::new(locator),
        config_store: Box::new(FakeStore(recorder.clone())),
        reporter: Box::new(FakeReporter(recorder.clone())),
        exporter: Box::new(FakeExporter(recorder.clone())),
    };
    MonitorEngine::with_history(collaborators, History::with_capacity(capacity))
}
