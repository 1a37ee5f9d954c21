use rerun::{archetypes::Scalar, RecordingStreamBuilder};

use crate::error::{DeadReckoningError, Result};
use crate::export::{PlotSink, TrajectorySeries};
use crate::types::MICROS_PER_SECOND;

const AXIS_NAMES: [&str; 3] = ["x", "y", "z"];

/// Rerun plotting sink for dead-reckoning runs.
///
/// Writes three scalar groups (`accel`, `velocity`, `position`), one per
/// stacked plot, on a `time_s` timeline measured from the first sample.
pub struct RerunLogger {
    rec: rerun::RecordingStream,
}

impl RerunLogger {
    /// Initialize a Rerun recording saved to `output_path` (e.g. `run.rrd`).
    pub fn new(output_path: &str) -> Result<Self> {
        let rec = RecordingStreamBuilder::new("auv_dead_reckoning")
            .save(output_path)
            .map_err(|e| {
                DeadReckoningError::Export(format!("Failed to create Rerun recording: {}", e))
            })?;

        log::info!("Rerun recording initialized to: {}", output_path);

        Ok(RerunLogger { rec })
    }

    pub fn set_time(&self, elapsed_secs: f64) {
        self.rec.set_time_seconds("time_s", elapsed_secs);
    }

    pub fn log_scalar(&self, path: &str, value: f64) -> Result<()> {
        self.rec
            .log(path, &Scalar::new(value))
            .map_err(|e| DeadReckoningError::Export(format!("Rerun log {}: {}", path, e)))
    }

    fn log_row(&self, group: &str, row: ndarray::ArrayView1<f64>) -> Result<()> {
        for (axis, value) in AXIS_NAMES.iter().zip(row.iter()) {
            self.log_scalar(&format!("{}/{}", group, axis), *value)?;
        }
        Ok(())
    }
}

impl PlotSink for RerunLogger {
    fn plot(&mut self, series: &TrajectorySeries) -> Result<()> {
        let Some(&t0) = series.time_us.first() else {
            return Ok(());
        };
        for (idx, &t) in series.time_us.iter().enumerate() {
            self.set_time(t.saturating_sub(t0) as f64 / MICROS_PER_SECOND);
            self.log_row("accel", series.accel.row(idx))?;
            self.log_row("velocity", series.velocity.row(idx))?;
            self.log_row("position", series.position.row(idx))?;
        }
        log::info!("Logged {} samples to Rerun", series.len());
        Ok(())
    }
}
