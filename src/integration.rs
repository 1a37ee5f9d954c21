//! Dead-reckoning integration: acceleration → velocity → position.
//!
//! Velocity takes the trapezoidal average of consecutive accelerations.
//! Position is then advanced with the *updated* velocity (semi-implicit
//! Euler), not a trapezoid of velocities. The resulting drift profile is
//! part of the output contract and must not be changed.

use log::debug;

use crate::types::{elapsed_seconds, KinematicSample, MatchedSample, Vec3};

/// Integrate a time-ordered matched sequence.
///
/// One output per input, same timestamps. The first output is at rest.
pub fn integrate(matched: &[MatchedSample]) -> Vec<KinematicSample> {
    let Some(first) = matched.first() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(matched.len());
    let mut velocity = Vec3::zeros();
    let mut position = Vec3::zeros();
    out.push(KinematicSample::at_rest(first.timestamp_us));

    for window in matched.windows(2) {
        let (prev, cur) = (&window[0], &window[1]);
        let dt = elapsed_seconds(prev.timestamp_us, cur.timestamp_us);

        let avg_accel = (prev.accel + cur.accel) / 2.0;
        velocity += avg_accel * dt;
        position += velocity * dt;

        out.push(KinematicSample {
            timestamp_us: cur.timestamp_us,
            velocity,
            position,
        });
    }

    if let Some(last) = out.last() {
        debug!(
            "Integrated {} samples; final v=({:.3}, {:.3}, {:.3}) p=({:.3}, {:.3}, {:.3})",
            out.len(),
            last.velocity.x,
            last.velocity.y,
            last.velocity.z,
            last.position.x,
            last.position.y,
            last.position.z
        );
    }

    out
}
