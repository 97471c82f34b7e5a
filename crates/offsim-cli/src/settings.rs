//! Settings file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use offsim_engine::EngineConfig;
use offsim_store::SinkConfig;
use serde::{Deserialize, Serialize};

/// Everything the binary needs besides the subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub log_dir: PathBuf,
    /// Append to existing log files.
    pub append: bool,
    pub engine: EngineConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let sink = SinkConfig::default();
        Self {
            log_dir: sink.log_dir,
            append: sink.append,
            engine: EngineConfig::default(),
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing settings in {}", path.display()))
    }

    pub fn sink(&self) -> SinkConfig {
        SinkConfig {
            log_dir: self.log_dir.clone(),
            append: self.append,
        }
    }
}
