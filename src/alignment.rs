//! Temporal alignment of the two accelerometer streams.
//!
//! Forward-only greedy matcher: two cursors walk the sorted streams and pair
//! samples whose timestamps differ by at most the tolerance. Each sample is
//! consumed at most once. Linear in the combined stream length.

use log::{debug, warn};
use serde::Serialize;

use crate::types::{RawSample, SensorStream};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentReport {
    pub pairs: usize,
    pub unmatched_primary: usize,
    pub unmatched_secondary: usize,
}

#[derive(Clone, Debug)]
pub struct Alignment {
    pub pairs: Vec<(RawSample, RawSample)>,
    pub report: AlignmentReport,
}

/// Pair samples from `primary` and `secondary` within `tolerance_us`.
///
/// Both streams must already be sorted ascending by timestamp.
pub fn align(primary: &SensorStream, secondary: &SensorStream, tolerance_us: u64) -> Alignment {
    let s1 = primary.samples();
    let s2 = secondary.samples();
    let mut pairs = Vec::with_capacity(s1.len().min(s2.len()));
    let mut i = 0;
    let mut j = 0;

    while i < s1.len() && j < s2.len() {
        let t1 = s1[i].timestamp_us;
        let t2 = s2[j].timestamp_us;
        if t1.abs_diff(t2) <= tolerance_us {
            pairs.push((s1[i], s2[j]));
            i += 1;
            j += 1;
        } else if t1 < t2 {
            i += 1;
        } else {
            j += 1;
        }
    }

    let report = AlignmentReport {
        pairs: pairs.len(),
        unmatched_primary: s1.len() - pairs.len(),
        unmatched_secondary: s2.len() - pairs.len(),
    };

    if pairs.is_empty() && !(s1.is_empty() && s2.is_empty()) {
        warn!(
            "No samples matched within {} us ({} primary, {} secondary)",
            tolerance_us,
            s1.len(),
            s2.len()
        );
    } else {
        debug!(
            "Aligned {} pairs; dropped {} primary, {} secondary",
            report.pairs, report.unmatched_primary, report.unmatched_secondary
        );
    }

    Alignment { pairs, report }
}
