use crate::config::{PipelineConfig, DEFAULT_GRAVITY, DEFAULT_SCALE};
use crate::types::{MatchedSample, RawSample};

/// Converts matched raw pairs to fused physical acceleration.
///
/// Horizontal axes: average the two raw counts, then scale to m/s².
/// Vertical axis: each sensor has its static +1 g bias (one full-scale count)
/// removed before scaling, and the two corrected values are averaged.
/// Assumes both sensors' z axes are aligned with gravity; nothing checks that.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitCorrector {
    scale: f64,
    gravity: f64,
}

impl Default for UnitCorrector {
    fn default() -> Self {
        Self::new(DEFAULT_SCALE, DEFAULT_GRAVITY)
    }
}

impl UnitCorrector {
    pub fn new(scale: f64, gravity: f64) -> Self {
        Self { scale, gravity }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.scale, config.gravity)
    }

    fn horizontal(&self, raw1: i64, raw2: i64) -> f64 {
        (raw1 as f64 + raw2 as f64) / 2.0 / self.scale * self.gravity
    }

    fn vertical(&self, raw_z: i64) -> f64 {
        (raw_z as f64 - self.scale) / self.scale * self.gravity
    }

    /// Fuse one matched pair. The timestamp comes from the primary sample.
    pub fn correct(&self, primary: &RawSample, secondary: &RawSample) -> MatchedSample {
        let ax = self.horizontal(primary.raw_x, secondary.raw_x);
        let ay = self.horizontal(primary.raw_y, secondary.raw_y);
        let az = (self.vertical(primary.raw_z) + self.vertical(secondary.raw_z)) / 2.0;
        MatchedSample::new(primary.timestamp_us, ax, ay, az)
    }

    pub fn correct_all(&self, pairs: &[(RawSample, RawSample)]) -> Vec<MatchedSample> {
        pairs.iter().map(|(p, s)| self.correct(p, s)).collect()
    }
}
