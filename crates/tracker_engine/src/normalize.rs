use tracker_core::{Catalog, CatalogItem};
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use crate::{decode_text, read_csv, read_xlsx, RawTable, SourceFormat, UploadError};

/// Columns the catalog understands. Header matching ignores case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalColumn {
    GradeUrl,
    Subject,
    Topic,
    TopicUrl,
    ItemTitle,
    ItemUrl,
}

impl LogicalColumn {
    pub const ALL: [LogicalColumn; 6] = [
        LogicalColumn::GradeUrl,
        LogicalColumn::Subject,
        LogicalColumn::Topic,
        LogicalColumn::TopicUrl,
        LogicalColumn::ItemTitle,
        LogicalColumn::ItemUrl,
    ];

    pub fn header(self) -> &'static str {
        match self {
            LogicalColumn::GradeUrl => "GradeURL",
            LogicalColumn::Subject => "Subject",
            LogicalColumn::Topic => "Topic",
            LogicalColumn::TopicUrl => "TopicURL",
            LogicalColumn::ItemTitle => "ItemTitle",
            LogicalColumn::ItemUrl => "ItemURL",
        }
    }

    fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|column| column.header().eq_ignore_ascii_case(header))
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Position of each logical column in a raw table, if present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnMap {
    positions: [Option<usize>; 6],
}

impl ColumnMap {
    pub fn position(&self, column: LogicalColumn) -> Option<usize> {
        self.positions[column.slot()]
    }

    pub fn missing(&self) -> Vec<LogicalColumn> {
        LogicalColumn::ALL
            .into_iter()
            .filter(|column| self.position(*column).is_none())
            .collect()
    }
}

/// Maps headers to logical columns; the first matching header wins.
pub fn resolve_columns(headers: &[String]) -> ColumnMap {
    let mut map = ColumnMap::default();
    for (index, header) in headers.iter().enumerate() {
        if let Some(column) = LogicalColumn::from_header(header) {
            map.positions[column.slot()].get_or_insert(index);
        }
    }
    map
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeReport {
    pub catalog: Catalog,
    /// Rows discarded because their ItemURL was empty.
    pub dropped_rows: usize,
    pub missing_columns: Vec<LogicalColumn>,
}

/// Turns a raw table into catalog items: nulls become empty strings, every
/// value is trimmed, rows without an ItemURL are dropped, order is kept.
pub fn normalize_table(table: &RawTable) -> NormalizeReport {
    let columns = resolve_columns(&table.headers);
    let value = |row: usize, column: LogicalColumn| -> String {
        columns
            .position(column)
            .and_then(|index| table.cell(row, index))
            .map(|cell| cell.trim().to_string())
            .unwrap_or_default()
    };

    let mut items = Vec::with_capacity(table.rows.len());
    let mut dropped_rows = 0;
    for row in 0..table.rows.len() {
        let url = value(row, LogicalColumn::ItemUrl);
        if url.is_empty() {
            dropped_rows += 1;
            continue;
        }
        items.push(CatalogItem {
            subject: value(row, LogicalColumn::Subject),
            topic: value(row, LogicalColumn::Topic),
            title: value(row, LogicalColumn::ItemTitle),
            url,
            grade_url: value(row, LogicalColumn::GradeUrl),
            topic_url: value(row, LogicalColumn::TopicUrl),
        });
    }

    NormalizeReport {
        catalog: Catalog::new(items),
        dropped_rows,
        missing_columns: columns.missing(),
    }
}

/// Parses `bytes` in a known format and normalizes the result.
pub fn parse_catalog(bytes: &[u8], format: SourceFormat) -> Result<Catalog, UploadError> {
    let table = match format {
        SourceFormat::Csv => {
            let decoded = decode_text(bytes).map_err(|err| UploadError::parse(format, err))?;
            tracker_debug!("Decoded CSV upload as {}", decoded.encoding_label);
            read_csv(&decoded.text)?
        }
        SourceFormat::Xlsx => read_xlsx(bytes)?,
    };

    let report = normalize_table(&table);
    if !report.missing_columns.is_empty() {
        let names: Vec<&str> = report.missing_columns.iter().map(|c| c.header()).collect();
        tracker_warn!("Upload is missing columns {:?}; using empty values", names);
    }
    if report.dropped_rows > 0 {
        tracker_warn!(
            "Dropped {} row(s) without an ItemURL",
            report.dropped_rows
        );
    }
    tracker_info!(
        "Parsed {} upload: {} rows, {} catalog items",
        format,
        table.rows.len(),
        report.catalog.len()
    );
    Ok(report.catalog)
}

/// Full upload pipeline: format detection by extension, parsing, normalization.
pub fn load_catalog(bytes: &[u8], filename: &str) -> Result<Catalog, UploadError> {
    let format = SourceFormat::from_filename(filename)?;
    parse_catalog(bytes, format)
}
