//! Groups reports by vessel and orders each group by time.

use crate::model::AisRecord;
use std::collections::BTreeMap;

/// All reports of one vessel, ordered by time. Ties keep ingestion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub vessel_id: String,
    pub records: Vec<AisRecord>,
}

impl Partition {
    /// Each report paired with its immediate predecessor.
    pub fn pairs(&self) -> impl Iterator<Item = (Option<&AisRecord>, &AisRecord)> {
        let prev = std::iter::once(None).chain(self.records.iter().map(Some));
        prev.zip(self.records.iter())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Splits the records into vessel partitions in canonical order: vessel ids
/// ascending, then time ascending within each vessel.
pub fn partition(records: Vec<AisRecord>) -> Vec<Partition> {
    let mut groups: BTreeMap<String, Vec<AisRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(record.vessel_id.clone())
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(vessel_id, mut records)| {
            // Ties fall back to ingestion order.
            records.sort_by(|a, b| a.time.cmp(&b.time).then(a.row.cmp(&b.row)));
            Partition { vessel_id, records }
        })
        .collect()
}
