// pipeline.rs — batch entry point for the dead-reckoning chain
//
// Loader -> Aligner -> Corrector -> Integrator -> Exporter, each stage run to
// completion before the next. No I/O beyond reading the record source; the
// caller decides which plotting sink (if any) receives the series.

use std::io::BufRead;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::alignment::{align, AlignmentReport};
use crate::config::PipelineConfig;
use crate::correction::UnitCorrector;
use crate::error::{DeadReckoningError, Result};
use crate::export::{export_series, TrajectorySeries};
use crate::integration::integrate;
use crate::loader::{load_path, load_reader, LoadReport, LoadedStreams};
use crate::types::{elapsed_seconds, horizontal_norm, KinematicSample, MatchedSample};

// ─── Run summary ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub load: LoadReport,
    pub alignment: AlignmentReport,
    pub matched_samples: usize,
    pub duration_s: f64,
    pub final_velocity: [f64; 3],
    pub final_position: [f64; 3],
    pub horizontal_distance_m: f64,
    pub peak_speed: f64,
}

impl RunSummary {
    fn new(
        load: LoadReport,
        alignment: AlignmentReport,
        matched: &[MatchedSample],
        kinematics: &[KinematicSample],
    ) -> Self {
        let duration_s = match (matched.first(), matched.last()) {
            (Some(a), Some(b)) => elapsed_seconds(a.timestamp_us, b.timestamp_us),
            _ => 0.0,
        };
        let (final_velocity, final_position, horizontal_distance_m) = kinematics
            .last()
            .map(|k| {
                (
                    [k.velocity.x, k.velocity.y, k.velocity.z],
                    [k.position.x, k.position.y, k.position.z],
                    horizontal_norm(&k.position),
                )
            })
            .unwrap_or(([0.0; 3], [0.0; 3], 0.0));
        let peak_speed = kinematics
            .iter()
            .map(KinematicSample::speed)
            .fold(0.0_f64, f64::max);

        Self {
            load,
            alignment,
            matched_samples: matched.len(),
            duration_s,
            final_velocity,
            final_position,
            horizontal_distance_m,
            peak_speed,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub matched: Vec<MatchedSample>,
    pub kinematics: Vec<KinematicSample>,
    pub series: TrajectorySeries,
    pub summary: RunSummary,
}

// ─── Pipeline ────────────────────────────────────────────────────────────────

pub struct Pipeline {
    config: PipelineConfig,
    corrector: UnitCorrector,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let corrector = UnitCorrector::from_config(&config);
        Ok(Self { config, corrector })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run against the configured `source_path`.
    pub fn run(&self) -> Result<PipelineOutput> {
        let path = self
            .config
            .source_path
            .as_deref()
            .ok_or_else(|| DeadReckoningError::Config("source_path is not set".to_string()))?;
        self.run_path(path)
    }

    pub fn run_path(&self, path: &Path) -> Result<PipelineOutput> {
        let loaded = load_path(path)?;
        self.run_streams(loaded)
    }

    pub fn run_reader<R: BufRead>(&self, reader: R) -> Result<PipelineOutput> {
        let loaded = load_reader(reader)?;
        self.run_streams(loaded)
    }

    /// Run every stage after loading.
    pub fn run_streams(&self, loaded: LoadedStreams) -> Result<PipelineOutput> {
        let LoadedStreams {
            primary,
            secondary,
            report: load_report,
        } = loaded;

        let alignment = align(&primary, &secondary, self.config.tolerance_us);
        let matched = self.corrector.correct_all(&alignment.pairs);
        if matched.is_empty() {
            warn!("No matched samples; trajectory will be empty");
        }

        let kinematics = integrate(&matched);
        let series = export_series(&matched, &kinematics)?;
        let summary = RunSummary::new(load_report, alignment.report, &matched, &kinematics);

        info!(
            "Pipeline done: {} matched over {:.3}s, final position ({:.3}, {:.3}, {:.3}) m",
            summary.matched_samples,
            summary.duration_s,
            summary.final_position[0],
            summary.final_position[1],
            summary.final_position[2]
        );

        Ok(PipelineOutput {
            matched,
            kinematics,
            series,
            summary,
        })
    }
}
