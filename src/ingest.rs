use crate::error::Result;
use crate::model::RawTable;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a delimited AIS export into a raw table. Header names are trimmed,
/// cells are kept verbatim.
pub fn read_table<R: Read>(reader: R, delimiter: u8) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    Ok(RawTable { columns, rows })
}

pub fn read_file(path: &Path, delimiter: u8) -> Result<RawTable> {
    let file = File::open(path)?;
    read_table(file, delimiter)
}
