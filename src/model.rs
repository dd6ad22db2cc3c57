use crate::error::{FeatureError, Result};
use crate::temporal::{parse_timestamp, Calendar};
use chrono::{DateTime, Utc};

pub static VESSEL_ID: &str = "vesselId";
pub static TIME: &str = "time";
pub static LATITUDE: &str = "latitude";
pub static LONGITUDE: &str = "longitude";
pub static HEADING: &str = "heading";

// Cells that stand for a missing numeric value.
static ABSENT: &[&str] = &["", "NaN", "nan", "NA", "null", "NULL"];

/// The in-memory table handed over by the ingestion side.
///
/// Every cell is kept as the raw text it was read with so that columns the
/// feature engine does not touch pass through unmodified.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Column positions of the fields the feature engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    vessel_id: usize,
    time: usize,
    latitude: usize,
    longitude: usize,
    heading: usize,
}

impl Schema {
    pub fn resolve(columns: &[String]) -> Result<Schema> {
        let find = |column: &'static str| {
            columns
                .iter()
                .position(|c| c.trim() == column)
                .ok_or(FeatureError::MissingColumn { column })
        };

        Ok(Schema {
            vessel_id: find(VESSEL_ID)?,
            time: find(TIME)?,
            latitude: find(LATITUDE)?,
            longitude: find(LONGITUDE)?,
            heading: find(HEADING)?,
        })
    }
}

/// One AIS report with its required fields parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AisRecord {
    /// 0-based position in the ingested table.
    pub row: usize,
    pub vessel_id: String,
    pub time: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub heading: Option<f64>,
}

impl AisRecord {
    pub fn parse(row: usize, cells: &[String], schema: &Schema) -> Result<AisRecord> {
        let cell = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or("");

        let vessel_id = cell(schema.vessel_id);
        if vessel_id.is_empty() {
            return Err(FeatureError::Schema {
                row,
                field: VESSEL_ID,
            });
        }

        let time = cell(schema.time);
        if time.is_empty() {
            return Err(FeatureError::Schema { row, field: TIME });
        }
        let time = parse_timestamp(time)
            .ok_or_else(|| FeatureError::parse(row, TIME, time, "unrecognised timestamp format"))?;

        let latitude = parse_optional(row, LATITUDE, cell(schema.latitude))?;
        let longitude = parse_optional(row, LONGITUDE, cell(schema.longitude))?;
        let heading = parse_optional(row, HEADING, cell(schema.heading))?;

        if let Some(lat) = latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(FeatureError::parse(row, LATITUDE, lat.to_string(), "outside [-90, 90]"));
            }
        }
        if let Some(lon) = longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(FeatureError::parse(
                    row,
                    LONGITUDE,
                    lon.to_string(),
                    "outside [-180, 180]",
                ));
            }
        }

        Ok(AisRecord {
            row,
            vessel_id: vessel_id.to_string(),
            time,
            latitude,
            longitude,
            heading,
        })
    }

    /// `(latitude, longitude)` when both are present.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

fn parse_optional(row: usize, field: &'static str, value: &str) -> Result<Option<f64>> {
    if ABSENT.contains(&value) {
        return Ok(None);
    }
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err(FeatureError::parse(row, field, value, "not a finite number")),
        Err(e) => Err(FeatureError::parse(row, field, value, e.to_string())),
    }
}

/// Consecutive-pair features of one report relative to its predecessor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Motion {
    /// meters
    pub distance_traveled: f64,
    /// seconds
    pub time_diff: f64,
    /// meters per second
    pub speed: f64,
    /// degrees, raw signed difference
    pub heading_change: f64,
}

/// Future position `horizon` steps ahead within the same vessel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FutureTarget {
    pub latitude_future: Option<f64>,
    pub longitude_future: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub record: AisRecord,
    pub calendar: Calendar,
    pub motion: Motion,
    pub target: FutureTarget,
}
