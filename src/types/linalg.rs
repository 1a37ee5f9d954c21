//! Linear algebra aliases for the dead-reckoning pipeline.
//!
//! Every per-axis quantity (acceleration, velocity, position) is a 3-vector
//! in the vehicle frame: x and y horizontal, z vertical.

use nalgebra::Vector3;

pub type Vec3 = Vector3<f64>;

/// Timestamp units per second. Timestamps are integer microseconds.
pub const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Signed elapsed seconds between two integer timestamps.
///
/// The subtraction happens on integers; only the difference is converted.
pub fn elapsed_seconds(earlier: u64, later: u64) -> f64 {
    (i128::from(later) - i128::from(earlier)) as f64 / MICROS_PER_SECOND
}

/// Horizontal (x/y plane) length of a vector.
pub fn horizontal_norm(v: &Vec3) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}
