use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeadReckoningError, Result};

/// Maximum timestamp gap (µs) for two samples to count as simultaneous.
pub const DEFAULT_TOLERANCE_US: u64 = 10_000;
/// Fixed-point count that corresponds to 1 g.
pub const DEFAULT_SCALE: f64 = 16_384.0;
/// Standard gravity, used as the physical unit for one full-scale count.
pub const DEFAULT_GRAVITY: f64 = 9.81;

// ─── Configuration ───────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub source_path: Option<PathBuf>,
    #[serde(alias = "tolerance")]
    pub tolerance_us: u64,
    pub scale: f64,
    pub gravity: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_path: None,
            tolerance_us: DEFAULT_TOLERANCE_US,
            scale: DEFAULT_SCALE,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| DeadReckoningError::Config(format!("{}: {}", path.display(), e)))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .map_err(|e| DeadReckoningError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(DeadReckoningError::Config(format!(
                "scale must be positive and finite, got {}",
                self.scale
            )));
        }
        if !self.gravity.is_finite() {
            return Err(DeadReckoningError::Config(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }
        Ok(())
    }
}
