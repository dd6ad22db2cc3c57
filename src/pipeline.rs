//! Batch feature engineering over a whole table of AIS reports.
//!
//! The table is parsed up front and the batch fails on the first malformed row.
//! Each vessel partition is then enriched on its own, without touching any
//! other partition, and the results are concatenated in canonical order
//! (vessel id ascending, then time ascending).

use crate::error::{FeatureError, Result, SequenceAnomaly};
use crate::labels::future_targets;
use crate::model::{AisRecord, EnrichedRecord, RawTable, Schema};
use crate::motion::partition_motion;
use crate::sequencer::{partition, Partition};
use crate::temporal::Calendar;
use log::{debug, info, warn};
use rayon::prelude::*;

pub static DEFAULT_HORIZON: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureConfig {
    /// Number of positions ahead used for the future position targets.
    pub horizon: usize,
    /// Enrich vessel partitions on the rayon thread pool.
    pub parallel: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        FeatureConfig {
            horizon: DEFAULT_HORIZON,
            parallel: true,
        }
    }
}

impl FeatureConfig {
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(FeatureError::InvalidConfig(
                "prediction horizon must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    /// Input columns in header order.
    pub columns: Vec<String>,
    /// Raw input cells, indexed by `AisRecord::row`.
    pub cells: Vec<Vec<String>>,
    /// Enriched reports in canonical order.
    pub rows: Vec<EnrichedRecord>,
    pub anomalies: Vec<SequenceAnomaly>,
    pub vessel_count: usize,
}

impl FeatureTable {
    /// Raw input cells of an enriched report.
    pub fn cells_of(&self, record: &EnrichedRecord) -> &[String] {
        &self.cells[record.record.row]
    }
}

pub fn parse_records(table: &RawTable) -> Result<Vec<AisRecord>> {
    let schema = Schema::resolve(&table.columns)?;
    table
        .rows
        .iter()
        .enumerate()
        .map(|(row, cells)| AisRecord::parse(row, cells, &schema))
        .collect()
}

/// Enriches one vessel partition. Pure with respect to every other partition.
pub fn enrich_partition(
    partition: Partition,
    horizon: usize,
) -> (Vec<EnrichedRecord>, Vec<SequenceAnomaly>) {
    let (motion, anomalies) = partition_motion(&partition);
    let targets = future_targets(&partition.records, horizon);

    debug!(
        "vessel {}: {} records, {} anomalies",
        partition.vessel_id,
        partition.len(),
        anomalies.len()
    );

    let rows = partition
        .records
        .into_iter()
        .zip(motion)
        .zip(targets)
        .map(|((record, motion), target)| EnrichedRecord {
            calendar: Calendar::from(&record.time),
            record,
            motion,
            target,
        })
        .collect();

    (rows, anomalies)
}

pub fn engineer_features(table: &RawTable, config: &FeatureConfig) -> Result<FeatureTable> {
    config.validate()?;

    let records = parse_records(table)?;
    let record_count = records.len();
    let partitions = partition(records);
    let vessel_count = partitions.len();

    let enriched: Vec<(Vec<EnrichedRecord>, Vec<SequenceAnomaly>)> = if config.parallel {
        partitions
            .into_par_iter()
            .map(|p| enrich_partition(p, config.horizon))
            .collect()
    } else {
        partitions
            .into_iter()
            .map(|p| enrich_partition(p, config.horizon))
            .collect()
    };

    let mut rows = Vec::with_capacity(record_count);
    let mut anomalies = Vec::new();
    for (partition_rows, partition_anomalies) in enriched {
        rows.extend(partition_rows);
        anomalies.extend(partition_anomalies);
    }

    for anomaly in &anomalies {
        warn!(
            "vessel {}: {:?} between rows {} and {} (time_diff {}s)",
            anomaly.vessel_id, anomaly.kind, anomaly.previous_row, anomaly.row, anomaly.time_diff
        );
    }
    info!(
        "engineered features for {} records across {} vessels, {} sequence anomalies",
        rows.len(),
        vessel_count,
        anomalies.len()
    );

    Ok(FeatureTable {
        columns: table.columns.clone(),
        cells: table.rows.clone(),
        rows,
        anomalies,
        vessel_count,
    })
}
