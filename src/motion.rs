//! Distance, elapsed time, speed and heading change between consecutive reports.

use crate::error::{AnomalyKind, SequenceAnomaly};
use crate::model::{AisRecord, Motion};
use crate::sequencer::Partition;
use geo::{Distance, Geodesic, Point};
use std::cmp::Ordering;

/// Geodesic distance on the WGS84 ellipsoid in meters.
///
/// Karney's algorithm converges for every pair of points, including antipodal
/// points, pairs straddling the antimeridian and the poles.
pub fn geodesic_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (from_lat, from_lon) = from;
    let (to_lat, to_lon) = to;
    Geodesic.distance(Point::new(from_lon, from_lat), Point::new(to_lon, to_lat))
}

impl Motion {
    /// Features of `curr` relative to `prev`. A first report has no predecessor
    /// and every feature is zero.
    pub fn between(prev: Option<&AisRecord>, curr: &AisRecord) -> Motion {
        let Some(prev) = prev else {
            return Motion::default();
        };

        let distance_traveled = match (prev.position(), curr.position()) {
            (Some(from), Some(to)) => geodesic_distance(from, to),
            _ => 0.0,
        };

        let elapsed = curr.time - prev.time;
        let time_diff = match elapsed.num_nanoseconds() {
            Some(ns) => ns as f64 / 1e9,
            // Beyond ~292 years nanoseconds overflow.
            None => elapsed.num_milliseconds() as f64 / 1000.0,
        };

        let speed = if time_diff > 0.0 {
            distance_traveled / time_diff
        } else {
            0.0
        };

        let heading_change = match (prev.heading, curr.heading) {
            (Some(p), Some(c)) => c - p,
            _ => 0.0,
        };

        Motion {
            distance_traveled,
            time_diff,
            speed,
            heading_change,
        }
    }
}

/// Motion features for every report of the partition, plus the anomalies found
/// in its time ordering.
///
/// `partition` always yields time-sorted partitions, so `NonMonotonic` only
/// shows up for a `Partition` assembled by the caller.
pub fn partition_motion(partition: &Partition) -> (Vec<Motion>, Vec<SequenceAnomaly>) {
    let mut anomalies = Vec::new();
    let motion = partition
        .pairs()
        .map(|(prev, curr)| {
            let motion = Motion::between(prev, curr);
            if let Some(prev) = prev {
                let kind = match curr.time.cmp(&prev.time) {
                    Ordering::Equal => Some(AnomalyKind::DuplicateTimestamp),
                    Ordering::Less => Some(AnomalyKind::NonMonotonic),
                    Ordering::Greater => None,
                };
                if let Some(kind) = kind {
                    anomalies.push(SequenceAnomaly {
                        vessel_id: partition.vessel_id.clone(),
                        row: curr.row,
                        previous_row: prev.row,
                        time_diff: motion.time_diff,
                        kind,
                    });
                }
            }
            motion
        })
        .collect();

    (motion, anomalies)
}
