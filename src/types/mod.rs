pub mod linalg;

pub use linalg::*;

use serde::{Deserialize, Serialize};

/// Which of the two accelerometers produced a record.
///
/// Records carry the id as a plain integer; anything other than 1 or 2 has no
/// variant here and never makes it past the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorId {
    Primary,
    Secondary,
}

impl SensorId {
    pub fn from_raw(id: i64) -> Option<Self> {
        match id {
            1 => Some(SensorId::Primary),
            2 => Some(SensorId::Secondary),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i64 {
        match self {
            SensorId::Primary => 1,
            SensorId::Secondary => 2,
        }
    }
}

/// One parsed input record, still in fixed-point counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSample {
    pub sensor_id: SensorId,
    pub timestamp_us: u64,
    pub raw_x: i64,
    pub raw_y: i64,
    pub raw_z: i64,
}

impl RawSample {
    pub fn new(sensor_id: SensorId, timestamp_us: u64, raw_x: i64, raw_y: i64, raw_z: i64) -> Self {
        Self {
            sensor_id,
            timestamp_us,
            raw_x,
            raw_y,
            raw_z,
        }
    }
}

/// Samples from a single sensor, stable-sorted by timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorStream {
    sensor_id: SensorId,
    samples: Vec<RawSample>,
}

impl SensorStream {
    /// Build a stream from samples in input order.
    ///
    /// Samples belonging to another sensor are dropped, then the rest are
    /// sorted with a stable sort so equal timestamps keep their input order.
    pub fn from_unsorted(sensor_id: SensorId, samples: Vec<RawSample>) -> Self {
        let mut samples: Vec<RawSample> = samples
            .into_iter()
            .filter(|s| s.sensor_id == sensor_id)
            .collect();
        samples.sort_by_key(|s| s.timestamp_us);
        Self { sensor_id, samples }
    }

    pub fn empty(sensor_id: SensorId) -> Self {
        Self {
            sensor_id,
            samples: Vec::new(),
        }
    }

    pub fn sensor_id(&self) -> SensorId {
        self.sensor_id
    }

    pub fn samples(&self) -> &[RawSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Fused, gravity-corrected acceleration at one instant (m/s²).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchedSample {
    pub timestamp_us: u64,
    pub accel: Vec3,
}

impl MatchedSample {
    pub fn new(timestamp_us: u64, ax: f64, ay: f64, az: f64) -> Self {
        Self {
            timestamp_us,
            accel: Vec3::new(ax, ay, az),
        }
    }
}

/// Integrated velocity (m/s) and position (m) at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KinematicSample {
    pub timestamp_us: u64,
    pub velocity: Vec3,
    pub position: Vec3,
}

impl KinematicSample {
    pub fn at_rest(timestamp_us: u64) -> Self {
        Self {
            timestamp_us,
            velocity: Vec3::zeros(),
            position: Vec3::zeros(),
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}
