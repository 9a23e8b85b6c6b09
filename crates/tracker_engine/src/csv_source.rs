use csv::ReaderBuilder;

use crate::{RawTable, SourceFormat, UploadError};

/// Cell values read as null, matching common spreadsheet exports.
const NULL_SENTINELS: &[&str] = &[
    "", "#N/A", "#NA", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Reads decoded CSV text. The first record is the header row.
///
/// Short records are padded with nulls; records wider than the header are
/// rejected.
pub fn read_csv(text: &str) -> Result<RawTable, UploadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(ToOwned::to_owned)
        .collect();
    if headers.is_empty() {
        return Err(UploadError::parse(SourceFormat::Csv, "file has no header row"));
    }

    let mut table = RawTable::new(headers);
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        if record.len() > table.width() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(UploadError::parse(
                SourceFormat::Csv,
                format!(
                    "line {line} has {} fields, expected {}",
                    record.len(),
                    table.width()
                ),
            ));
        }
        table.push_row(record.iter().map(to_cell).collect());
    }
    Ok(table)
}

fn to_cell(raw: &str) -> Option<String> {
    if NULL_SENTINELS.contains(&raw) {
        None
    } else {
        Some(raw.to_owned())
    }
}

fn csv_error(err: csv::Error) -> UploadError {
    UploadError::parse(SourceFormat::Csv, err)
}
