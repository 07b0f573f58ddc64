use anyhow::Context;
use std::path::{Path, PathBuf};

use crate::models::EngineConfig;

/// 默认配置文件名
pub const CONFIG_FILE: &str = "process_monitor_config.json";

/// 上次使用的进程名与间隔的持久化
pub trait ConfigStore: Send {
    /// 读取失败时返回默认配置
    fn load(&self) -> EngineConfig;

    fn save(&self, config: &EngineConfig) -> anyhow::Result<()>;
}

/// JSON 文件实现：`{"process_name": "...", "interval": 1000}`
pub struct JsonConfigStore {
    path: PathBuf,
}

impl JsonConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> anyhow::Result<EngineConfig> {
        let data = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        Ok(config)
    }
}

impl Default for JsonConfigStore {
    fn default() -> Self {
        Self::new(CONFIG_FILE)
    }
}

impl ConfigStore for JsonConfigStore {
    fn load(&self) -> EngineConfig {
        if !self.path.exists() {
            return EngineConfig::default();
        }

        match self.read() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default config: {:#}", e);
                EngineConfig::default()
            }
        }
    }

    fn save(&self, config: &EngineConfig) -> anyhow::Result<()> {
        let data = serde_json::to_string(config)?;
        std::fs::write(&self.path, data)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        log::debug!("Saved config to {}", self.path.display());
        Ok(())
    }
}
