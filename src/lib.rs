//! Dead-reckoning trajectory estimation for an underwater vehicle from two
//! fixed-point accelerometers.
//!
//! The batch chain is: [`loader`] splits records per sensor, [`alignment`]
//! pairs the streams within a timestamp tolerance, [`correction`] converts and
//! fuses each pair, [`integration`] produces velocity and position, and
//! [`export`] packages the aligned arrays for a plotting sink.
//! [`pipeline::Pipeline`] runs all of it from a [`config::PipelineConfig`].

pub mod alignment;
pub mod config;
pub mod correction;
pub mod error;
pub mod export;
pub mod integration;
pub mod loader;
pub mod pipeline;
#[cfg(feature = "rerun")]
pub mod rerun_logger;
pub mod types;

pub use config::PipelineConfig;
pub use error::{DeadReckoningError, Result};
pub use export::{JsonFileSink, PlotSink, TrajectorySeries};
pub use pipeline::{Pipeline, PipelineOutput, RunSummary};
