pub mod config;
pub mod process;
pub mod sample;

pub use config::{EngineConfig, DEFAULT_INTERVAL_MS};
pub use process::{MonitorState, MonitorTarget, ProcessHandle};
pub use sample::{Metrics, Sample};
