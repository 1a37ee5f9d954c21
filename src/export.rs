//! Series exporter and the plotting-sink boundary.
//!
//! The exporter only repackages: matched timestamps and accelerations plus
//! the parallel kinematic samples become four aligned arrays. Nothing is
//! resampled or filtered here.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use ndarray::{Array1, Array2};
use serde::{Serialize, Serializer};

use crate::error::{DeadReckoningError, Result};
use crate::types::{KinematicSample, MatchedSample, Vec3};

/// Aligned time/acceleration/velocity/position arrays, `n` rows each.
///
/// Serializes as `{"time_us": [..], "accel": [[x, y, z], ..], ..}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrajectorySeries {
    #[serde(serialize_with = "serialize_column")]
    pub time_us: Array1<u64>,
    #[serde(serialize_with = "serialize_rows")]
    pub accel: Array2<f64>,
    #[serde(serialize_with = "serialize_rows")]
    pub velocity: Array2<f64>,
    #[serde(serialize_with = "serialize_rows")]
    pub position: Array2<f64>,
}

fn serialize_column<S: Serializer>(array: &Array1<u64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(array.iter())
}

fn serialize_rows<S: Serializer>(array: &Array2<f64>, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(array.outer_iter().map(|r| [r[0], r[1], r[2]]))
}

fn rows(vectors: impl Iterator<Item = Vec3>, n: usize) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((n, 3));
    for (mut row, v) in out.outer_iter_mut().zip(vectors) {
        row[0] = v.x;
        row[1] = v.y;
        row[2] = v.z;
    }
    out
}

impl TrajectorySeries {
    pub fn empty() -> Self {
        Self {
            time_us: Array1::zeros(0),
            accel: Array2::zeros((0, 3)),
            velocity: Array2::zeros((0, 3)),
            position: Array2::zeros((0, 3)),
        }
    }

    pub fn len(&self) -> usize {
        self.time_us.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_us.is_empty()
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = self
            .to_json()
            .map_err(|e| DeadReckoningError::Export(e.to_string()))?;
        fs::write(path, json)
            .map_err(|e| DeadReckoningError::Export(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }
}

/// Package matched and kinematic sequences as parallel arrays.
///
/// The two sequences come out of the integrator in lockstep; anything else is
/// reported rather than silently truncated.
pub fn export_series(
    matched: &[MatchedSample],
    kinematics: &[KinematicSample],
) -> Result<TrajectorySeries> {
    if matched.len() != kinematics.len() {
        return Err(DeadReckoningError::SeriesMismatch(format!(
            "{} matched samples but {} kinematic samples",
            matched.len(),
            kinematics.len()
        )));
    }
    if let Some((idx, (m, k))) = matched
        .iter()
        .zip(kinematics)
        .enumerate()
        .find(|(_, (m, k))| m.timestamp_us != k.timestamp_us)
    {
        return Err(DeadReckoningError::SeriesMismatch(format!(
            "timestamp mismatch at index {}: {} vs {}",
            idx, m.timestamp_us, k.timestamp_us
        )));
    }

    let n = matched.len();
    Ok(TrajectorySeries {
        time_us: matched.iter().map(|m| m.timestamp_us).collect(),
        accel: rows(matched.iter().map(|m| m.accel), n),
        velocity: rows(kinematics.iter().map(|k| k.velocity), n),
        position: rows(kinematics.iter().map(|k| k.position), n),
    })
}

// ─── Plotting sinks ──────────────────────────────────────────────────────────

/// Visualization boundary. Implementations receive the series unchanged.
pub trait PlotSink {
    fn plot(&mut self, series: &TrajectorySeries) -> Result<()>;
}

/// Writes the series as JSON for an external plotting tool.
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlotSink for JsonFileSink {
    fn plot(&mut self, series: &TrajectorySeries) -> Result<()> {
        if series.is_empty() {
            info!("Empty series; not writing {}", self.path.display());
            return Ok(());
        }
        series.save_json(&self.path)?;
        info!("Wrote {} samples to {}", series.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::integrate;

    fn sample_input() -> Vec<MatchedSample> {
        vec![
            MatchedSample::new(0, 1.0, 2.0, 3.0),
            MatchedSample::new(1_000_000, 1.0, 2.0, 3.0),
            MatchedSample::new(1_500_000, -1.0, 0.0, 0.5),
        ]
    }

    #[test]
    fn test_arrays_are_aligned() {
        let matched = sample_input();
        let kin = integrate(&matched);
        let series = export_series(&matched, &kin).unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.accel.dim(), (3, 3));
        assert_eq!(series.velocity.dim(), (3, 3));
        assert_eq!(series.position.dim(), (3, 3));
        assert_eq!(series.time_us.to_vec(), vec![0, 1_000_000, 1_500_000]);
        assert_eq!(series.accel[[2, 0]], -1.0);
        assert_eq!(series.accel[[0, 2]], 3.0);
        assert_eq!(series.velocity[[1, 1]], kin[1].velocity.y);
        assert_eq!(series.position[[2, 0]], kin[2].position.x);
    }

    #[test]
    fn test_empty_inputs_give_empty_arrays() {
        let series = export_series(&[], &[]).unwrap();
        assert!(series.is_empty());
        assert_eq!(series.accel.dim(), (0, 3));
        assert_eq!(series, TrajectorySeries::empty());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let matched = sample_input();
        let kin = integrate(&matched[..2]);
        let err = export_series(&matched, &kin).unwrap_err();
        assert!(matches!(err, DeadReckoningError::SeriesMismatch(_)));
    }

    #[test]
    fn test_timestamp_mismatch_rejected() {
        let matched = sample_input();
        let mut kin = integrate(&matched);
        kin[1].timestamp_us += 1;
        let err = export_series(&matched, &kin).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_json_layout() {
        let matched = sample_input();
        let series = export_series(&matched, &integrate(&matched)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&series.to_json().unwrap()).unwrap();
        assert_eq!(value["time_us"][1], 1_000_000);
        assert_eq!(value["accel"][0][1], 2.0);
        assert_eq!(value["velocity"].as_array().unwrap().len(), 3);
        assert_eq!(value["position"][0][0], 0.0);
    }

    #[test]
    fn test_json_rows_match_arrays() {
        let matched = sample_input();
        let series = export_series(&matched, &integrate(&matched)).unwrap();
        let value = serde_json::to_value(&series).unwrap();
        for (key, array) in [
            ("accel", &series.accel),
            ("velocity", &series.velocity),
            ("position", &series.position),
        ] {
            let rows = value[key].as_array().unwrap();
            assert_eq!(rows.len(), series.len());
            for (i, row) in rows.iter().enumerate() {
                let row: Vec<f64> = row.as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).collect();
                assert_eq!(row, array.row(i).to_vec());
            }
        }
        assert_eq!(value["time_us"].as_array().unwrap().len(), series.len());
    }

    #[test]
    fn test_empty_series_serializes_empty_lists() {
        let value = serde_json::to_value(TrajectorySeries::empty()).unwrap();
        assert_eq!(value["time_us"], serde_json::json!([]));
        assert_eq!(value["position"], serde_json::json!([]));
    }

    #[test]
    fn test_json_sink_skips_empty_series() {
        let path = std::env::temp_dir().join(format!("auv_dr_empty_{}.json", std::process::id()));
        let _ = fs::remove_file(&path);
        let mut sink = JsonFileSink::new(&path);
        sink.plot(&TrajectorySeries::empty()).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_json_sink_writes_file() {
        let path = std::env::temp_dir().join(format!("auv_dr_series_{}.json", std::process::id()));
        let matched = sample_input();
        let series = export_series(&matched, &integrate(&matched)).unwrap();
        let mut sink = JsonFileSink::new(&path);
        sink.plot(&series).unwrap();
        let text = fs::read_to_string(sink.path()).unwrap();
        let _ = fs::remove_file(&path);
        assert!(text.contains("\"velocity\""));
    }
}
