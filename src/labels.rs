use crate::model::{AisRecord, FutureTarget};

/// Position `horizon` steps ahead for every report of one vessel partition.
///
/// A report whose successor at `i + horizon` is missing, or whose successor has
/// no coordinate, takes the last defined target of the same partition. Targets
/// before the first defined one stay absent.
pub fn future_targets(records: &[AisRecord], horizon: usize) -> Vec<FutureTarget> {
    let latitude = carry_forward(shift(records, horizon, |r| r.latitude));
    let longitude = carry_forward(shift(records, horizon, |r| r.longitude));

    latitude
        .into_iter()
        .zip(longitude)
        .map(|(latitude_future, longitude_future)| FutureTarget {
            latitude_future,
            longitude_future,
        })
        .collect()
}

fn shift<F>(records: &[AisRecord], horizon: usize, field: F) -> Vec<Option<f64>>
where
    F: Fn(&AisRecord) -> Option<f64>,
{
    (0..records.len())
        .map(|i| records.get(i + horizon).and_then(&field))
        .collect()
}

fn carry_forward(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .into_iter()
        .map(|v| {
            if v.is_some() {
                last = v;
            }
            last
        })
        .collect()
}
