use std::path::PathBuf;

use anyhow::{Context, Result};
use auv_dead_reckoning::export::{JsonFileSink, PlotSink};
use auv_dead_reckoning::{Pipeline, PipelineConfig};
use chrono::Utc;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "dead_reckoning")]
#[command(about = "Dual-accelerometer dead reckoning for AUV recordings", long_about = None)]
struct Args {
    /// Recording with `sensor_id,timestamp_us,raw_x,raw_y,raw_z` lines (.gz accepted)
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// JSON config file (fields: source_path, tolerance_us, scale, gravity)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Max timestamp difference for pairing, in microseconds
    #[arg(long)]
    tolerance: Option<u64>,

    /// Fixed-point count corresponding to 1 g
    #[arg(long)]
    scale: Option<f64>,

    /// Physical value of 1 g in m/s²
    #[arg(long)]
    gravity: Option<f64>,

    /// Write the exported series as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write series to `trajectory_<timestamp>.json` in this directory
    #[arg(long, conflicts_with = "output")]
    output_dir: Option<PathBuf>,

    /// Write a Rerun recording (.rrd); needs the `rerun` feature
    #[arg(long)]
    rerun: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match args.config.as_ref() {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(source) = args.source.as_ref() {
        config.source_path = Some(source.clone());
    }
    if let Some(tolerance) = args.tolerance {
        config.tolerance_us = tolerance;
    }
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(gravity) = args.gravity {
        config.gravity = gravity;
    }
    if config.source_path.is_none() {
        anyhow::bail!("Provide a SOURCE path or set source_path in --config");
    }
    Ok(config)
}

fn ts_now_clean() -> String {
    Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(feature = "rerun")]
fn sink_rerun(path: &std::path::Path, series: &auv_dead_reckoning::TrajectorySeries) -> Result<()> {
    let mut logger = auv_dead_reckoning::rerun_logger::RerunLogger::new(&path.display().to_string())?;
    logger.plot(series)?;
    Ok(())
}

#[cfg(not(feature = "rerun"))]
fn sink_rerun(_path: &std::path::Path, _series: &auv_dead_reckoning::TrajectorySeries) -> Result<()> {
    anyhow::bail!("--rerun requires building with `--features rerun`")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = build_config(&args)?;
    info!(
        "Source: {} (tolerance {} us, scale {}, g {})",
        config
            .source_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        config.tolerance_us,
        config.scale,
        config.gravity
    );

    let pipeline = Pipeline::new(config).context("Invalid pipeline configuration")?;
    let output = pipeline.run().context("Dead-reckoning run failed")?;

    let json_path = match (args.output.as_ref(), args.output_dir.as_ref()) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(dir)) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Creating {}", dir.display()))?;
            Some(dir.join(format!("trajectory_{}.json", ts_now_clean())))
        }
        (None, None) => None,
    };
    if let Some(path) = json_path {
        JsonFileSink::new(path).plot(&output.series)?;
    }
    if let Some(path) = args.rerun.as_ref() {
        sink_rerun(path, &output.series)?;
    }

    println!("{}", serde_json::to_string_pretty(&output.summary)?);
    Ok(())
}
