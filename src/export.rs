use crate::error::Result;
use crate::pipeline::FeatureTable;
use std::io::Write;

pub static FEATURE_COLUMNS: &[&str] = &[
    "hour",
    "day_of_week",
    "month",
    "distance_traveled",
    "time_diff",
    "speed",
    "heading_change",
    "latitude_future",
    "longitude_future",
];

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes the input columns followed by the engineered features, one line per
/// report in canonical order. Absent values are empty cells.
pub fn write_table<W: Write>(table: &FeatureTable, writer: W, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    let header = table
        .columns
        .iter()
        .map(String::as_str)
        .chain(FEATURE_COLUMNS.iter().copied());
    wtr.write_record(header)?;

    for row in &table.rows {
        let features = [
            row.calendar.hour.to_string(),
            row.calendar.day_of_week.to_string(),
            row.calendar.month.to_string(),
            row.motion.distance_traveled.to_string(),
            row.motion.time_diff.to_string(),
            row.motion.speed.to_string(),
            row.motion.heading_change.to_string(),
            optional(row.target.latitude_future),
            optional(row.target.longitude_future),
        ];
        let cells = table.cells_of(row).iter().cloned();
        wtr.write_record(cells.chain(features))?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the sequence anomalies as a side table.
pub fn write_anomalies<W: Write>(table: &FeatureTable, writer: W, delimiter: u8) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    for anomaly in &table.anomalies {
        wtr.serialize(anomaly)?;
    }
    wtr.flush()?;
    Ok(())
}
