//! CLI configuration.
//!
//! Defaults can be stored in a TOML file passed with `--config` (or the
//! `SLOT_CONFIG` environment variable). Command-line flags override file
//! values.
//!
//! ```toml
//! [grid]
//! dst_policy = "skip"
//!
//! [heatmap]
//! timezone = "Asia/Ho_Chi_Minh"
//!
//! [suggestions]
//! limit = 5
//! min_percentage = 60.0
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use slot_engine::{DstPolicy, SuggestionFilter};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridSettings,
    pub heatmap: HeatmapSettings,
    pub suggestions: SuggestionFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// How slot starts inside a DST gap are handled.
    pub dst_policy: DstPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapSettings {
    /// Viewer zone; the meeting window's own zone when unset.
    pub timezone: Option<String>,
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config: {}", path.display()))
    }
}
