//! Reads the first worksheet of an OOXML workbook into a [`RawTable`].

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{RawTable, SourceFormat, UploadError};

/// Maximum decompressed bytes to read from a single ZIP entry (zip-bomb protection).
const MAX_XML_ENTRY_BYTES: u64 = 50 * 1024 * 1024;
/// Maximum non-empty cells read from the worksheet.
const MAX_CELLS_PER_SHEET: usize = 1_000_000;

const WORKBOOK: &str = "xl/workbook.xml";
const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
const WORKSHEET_PREFIX: &str = "xl/worksheets/sheet";

type Archive<'a> = zip::ZipArchive<Cursor<&'a [u8]>>;

/// Parses workbook bytes. The first non-empty row is the header row.
pub fn read_xlsx(bytes: &[u8]) -> Result<RawTable, UploadError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(xlsx_error)?;
    let shared_strings = if has_entry(&archive, SHARED_STRINGS) {
        let xml = read_entry(&mut archive, SHARED_STRINGS)?;
        read_shared_strings(&xml)?
    } else {
        Vec::new()
    };
    let sheet = first_sheet_path(&mut archive)?;
    let xml = read_entry(&mut archive, &sheet)?;
    let grid = read_sheet_cells(&xml, &shared_strings)?;
    Ok(grid_to_table(grid))
}

fn xlsx_error(err: impl std::fmt::Display) -> UploadError {
    UploadError::parse(SourceFormat::Xlsx, err)
}

fn has_entry(archive: &Archive<'_>, name: &str) -> bool {
    archive.file_names().any(|entry| entry == name)
}

fn read_entry(archive: &mut Archive<'_>, name: &str) -> Result<Vec<u8>, UploadError> {
    let entry = archive.by_name(name).map_err(xlsx_error)?;
    let mut out = Vec::new();
    entry
        .take(MAX_XML_ENTRY_BYTES)
        .read_to_end(&mut out)
        .map_err(xlsx_error)?;
    if out.len() as u64 >= MAX_XML_ENTRY_BYTES {
        return Err(xlsx_error(format!(
            "ZIP entry {name} exceeds size limit ({MAX_XML_ENTRY_BYTES} bytes)"
        )));
    }
    Ok(out)
}

fn attribute(element: &BytesStart<'_>, local_name: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == local_name)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Resolves the first sheet in workbook order, falling back to the
/// lowest-numbered worksheet part.
fn first_sheet_path(archive: &mut Archive<'_>) -> Result<String, UploadError> {
    if has_entry(archive, WORKBOOK) && has_entry(archive, WORKBOOK_RELS) {
        let workbook = read_entry(archive, WORKBOOK)?;
        let rels = read_entry(archive, WORKBOOK_RELS)?;
        if let Some(rel_id) = first_element_attribute(&workbook, b"sheet", b"id")? {
            if let Some(target) = relationship_target(&rels, &rel_id)? {
                let path = match target.strip_prefix('/') {
                    Some(absolute) => absolute.to_string(),
                    None => format!("xl/{target}"),
                };
                if has_entry(archive, &path) {
                    return Ok(path);
                }
            }
        }
    }

    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with(WORKSHEET_PREFIX) && n.ends_with(".xml"))
        .map(ToOwned::to_owned)
        .collect();
    names.sort_by_key(|name| {
        name.trim_start_matches(WORKSHEET_PREFIX)
            .trim_end_matches(".xml")
            .parse::<u32>()
            .unwrap_or(u32::MAX)
    });
    names
        .into_iter()
        .next()
        .ok_or_else(|| xlsx_error("workbook has no worksheets"))
}

fn first_element_attribute(
    xml: &[u8],
    element: &[u8],
    attr: &[u8],
) -> Result<Option<String>, UploadError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == element => {
                return Ok(attribute(&e, attr));
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xlsx_error(e)),
            _ => {}
        }
        buf.clear();
    }
}

fn relationship_target(xml: &[u8], id: &str) -> Result<Option<String>, UploadError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if attribute(&e, b"Id").as_deref() == Some(id) {
                    return Ok(attribute(&e, b"Target"));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xlsx_error(e)),
            _ => {}
        }
        buf.clear();
    }
}

/// Shared string table; rich-text runs are concatenated, phonetic runs skipped.
fn read_shared_strings(xml: &[u8]) -> Result<Vec<String>, UploadError> {
    let mut strings = Vec::new();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;
    let mut phonetic_depth = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"rPh" => phonetic_depth += 1,
                b"t" if phonetic_depth == 0 => in_text = current.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(te)) if in_text => {
                let text = te.unescape().map_err(xlsx_error)?;
                if let Some(current) = current.as_mut() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"si" => strings.extend(current.take()),
                b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xlsx_error(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(strings)
}

/// Cell being assembled while walking a `<c>` element.
#[derive(Default)]
struct PendingCell {
    row: usize,
    column: usize,
    kind: Option<String>,
    value: String,
}

impl PendingCell {
    fn resolve(self, shared_strings: &[String]) -> Result<Option<String>, UploadError> {
        let value = match self.kind.as_deref() {
            Some("s") => {
                let index: usize = self
                    .value
                    .trim()
                    .parse()
                    .map_err(|_| xlsx_error(format!("bad shared string index {:?}", self.value)))?;
                let text = shared_strings.get(index).ok_or_else(|| {
                    xlsx_error(format!("shared string index {index} out of range"))
                })?;
                Some(text.clone())
            }
            Some("b") => {
                let flag = if self.value.trim() == "1" { "TRUE" } else { "FALSE" };
                Some(flag.to_string())
            }
            Some("e") => None,
            // "n", "str", "inlineStr", "d" and untyped cells carry their text directly.
            _ => Some(self.value),
        };
        Ok(value.filter(|v| !v.is_empty()))
    }
}

type Grid = BTreeMap<usize, BTreeMap<usize, String>>;

fn read_sheet_cells(xml: &[u8], shared_strings: &[String]) -> Result<Grid, UploadError> {
    let mut grid = Grid::new();
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut next_row = 0usize;
    let mut next_column = 0usize;
    let mut current_row = 0usize;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut cell_count = 0usize;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_index(&e).unwrap_or(next_row);
                    next_row = current_row + 1;
                    next_column = 0;
                }
                b"c" => {
                    let column = attribute(&e, b"r")
                        .and_then(|r| column_index(&r))
                        .unwrap_or(next_column);
                    next_column = column + 1;
                    cell = Some(PendingCell {
                        row: current_row,
                        column,
                        kind: attribute(&e, b"t"),
                        value: String::new(),
                    });
                }
                // <v> holds values; <t> appears inside inline strings (<is>).
                b"v" | b"t" => in_value = cell.is_some(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = row_index(&e).unwrap_or(next_row);
                    next_row = current_row + 1;
                }
                b"c" => {
                    let column = attribute(&e, b"r")
                        .and_then(|r| column_index(&r))
                        .unwrap_or(next_column);
                    next_column = column + 1;
                }
                _ => {}
            },
            Ok(Event::Text(te)) if in_value => {
                let text = te.unescape().map_err(xlsx_error)?;
                if let Some(cell) = cell.as_mut() {
                    cell.value.push_str(&text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"c" => {
                    if let Some(done) = cell.take() {
                        let (row, column) = (done.row, done.column);
                        if let Some(value) = done.resolve(shared_strings)? {
                            cell_count += 1;
                            if cell_count > MAX_CELLS_PER_SHEET {
                                return Err(xlsx_error(format!(
                                    "worksheet exceeds {MAX_CELLS_PER_SHEET} cells"
                                )));
                            }
                            grid.entry(row).or_default().insert(column, value);
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xlsx_error(e)),
            _ => {}
        }
        buf.clear();
    }
    Ok(grid)
}

fn row_index(element: &BytesStart<'_>) -> Option<usize> {
    attribute(element, b"r")
        .and_then(|r| r.trim().parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
}

/// Zero-based column of an A1-style reference (`"C7"` -> 2).
fn column_index(reference: &str) -> Option<usize> {
    let letters: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() {
        return None;
    }
    letters
        .chars()
        .try_fold(0usize, |acc, c| {
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })
        .map(|n| n - 1)
}

fn grid_to_table(grid: Grid) -> RawTable {
    let mut rows = grid.into_values();
    let Some(header_cells) = rows.next() else {
        return RawTable::default();
    };
    let width = header_cells.keys().next_back().map_or(0, |last| last + 1);
    let headers = (0..width)
        .map(|column| header_cells.get(&column).cloned().unwrap_or_default())
        .collect();
    let mut table = RawTable::new(headers);
    // Cells right of the last header cell are ignored, unlike ragged CSV.
    for cells in rows {
        table.push_row(
            (0..width)
                .map(|column| cells.get(&column).cloned())
                .collect(),
        );
    }
    table
}
