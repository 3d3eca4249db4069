//! Chart settings shared by the CLI and the desktop app.
//!
//! Settings come from defaults, optionally overlaid by a JSON file. Command-line flags
//! override both (see the binaries).

use crate::models::AxisSelection;
use crate::storage::DEFAULT_DATA_PATH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// CSV with one row per state.
    pub data: PathBuf,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Initial axis fields.
    pub selection: AxisSelection,
    /// Axis transition length in milliseconds.
    pub transition_ms: u64,
    /// Locale tag for tick labels.
    pub locale: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            data: PathBuf::from(DEFAULT_DATA_PATH),
            width: 960,
            height: 660,
            selection: AxisSelection::default(),
            transition_ms: 1000,
            locale: "en".to_string(),
        }
    }
}

impl ChartConfig {
    /// Read a JSON config file; missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: ChartConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Defaults, or the file at `path` when given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
