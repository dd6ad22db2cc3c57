//! Error types for feature engineering.
//!
//! Schema and parse failures abort the whole batch. Sequence anomalies are
//! not errors; they travel with the output table instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeatureError {
    /// A required column is absent from the header.
    #[error("required column '{column}' is missing from the header")]
    MissingColumn { column: &'static str },

    /// A required value is empty for one record.
    #[error("row {row}: required field '{field}' is empty")]
    Schema { row: usize, field: &'static str },

    /// A value is present but malformed.
    #[error("row {row}: cannot parse {field} '{value}': {reason}")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FeatureError>;

impl FeatureError {
    pub fn parse(
        row: usize,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            row,
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True for a missing column or a missing required value.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::MissingColumn { .. } | Self::Schema { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum AnomalyKind {
    /// Two reports of one vessel share a timestamp.
    DuplicateTimestamp,
    /// A report is older than its predecessor. Only reachable for a
    /// `Partition` built by hand, since `sequencer::partition` sorts by time.
    NonMonotonic,
}

/// A data-quality finding inside one vessel partition.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SequenceAnomaly {
    pub vessel_id: String,
    pub row: usize,
    pub previous_row: usize,
    pub time_diff: f64,
    pub kind: AnomalyKind,
}
