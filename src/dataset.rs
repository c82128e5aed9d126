//! Loading the source CSV into an immutable in-memory table.
//!
//! Bibliographic exports come with uncertain text encodings, so the loader
//! tries a fixed list of candidate encodings in order and parses the first
//! one that decodes cleanly.

use crate::errors::{Result, data_load_error, schema_error};
use encoding_rs::{EUC_KR, Encoding, UTF_8};
use itertools::Itertools;
use log::debug;
use std::fs;
use std::path::Path;

pub type Year = i32;

/// Column holding the publication year.
pub const YEAR_COLUMN: &str = "Publication Year";
/// Column searched for keyword matches.
pub const KEYWORD_COLUMN: &str = "Author Keywords";
/// Column holding the semicolon-delimited subject categories.
pub const CATEGORY_COLUMN: &str = "WoS Categories";

/// UTF-8 first (BOM is stripped automatically), then EUC-KR for the
/// Korean-locale exports.
const CANDIDATE_ENCODINGS: [&Encoding; 2] = [UTF_8, EUC_KR];

/// An immutable table of records in source order.
///
/// Rows are stored as plain strings; missing trailing cells are padded with
/// empty strings so every row has one cell per column. Business columns are
/// not validated at load time, callers check the columns they need with
/// [Table::require_column] or [Table::require_columns].
#[derive(Debug)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Table {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect_vec();
        Table { columns, rows }
    }

    /// Read and decode the source file, trying each candidate encoding in
    /// order until one decodes without errors.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Table> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| data_load_error(format!("{}: {}", path.display(), e)))?;
        for encoding in CANDIDATE_ENCODINGS {
            let (text, actual, had_errors) = encoding.decode(&bytes);
            if had_errors {
                debug!("{}: decoding as {} failed", path.display(), encoding.name());
                continue;
            }
            debug!("{}: decoded as {}", path.display(), actual.name());
            let table = parse_csv(&text)?;
            debug!(
                "{}: {} records, {} columns",
                path.display(),
                table.len(),
                table.columns.len()
            );
            return Ok(table);
        }
        Err(data_load_error(format!(
            "{}: no candidate encoding could decode the file",
            path.display()
        )))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Like [Table::column_index] but fails fast with a schema error.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| schema_error(vec![name.to_owned()]))
    }

    /// Check several columns at once so the error names every missing one.
    pub fn require_columns(&self, names: &[&str]) -> Result<Vec<usize>> {
        let missing = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| (*name).to_owned())
            .collect_vec();
        if !missing.is_empty() {
            return Err(schema_error(missing));
        }
        Ok(names
            .iter()
            .map(|name| self.column_index(name).expect("column was just checked"))
            .collect_vec())
    }

    pub fn cell(&self, row: usize, col: usize) -> &str {
        &self.rows[row][col]
    }

    /// The cell value, or `None` when it is blank.
    pub fn cell_opt(&self, row: usize, col: usize) -> Option<&str> {
        let value = self.cell(row, col);
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

fn parse_csv(text: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let columns = reader
        .headers()
        .map_err(|e| data_load_error(format!("malformed header: {e}")))?
        .iter()
        .map(|h| h.to_owned())
        .collect_vec();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| data_load_error(format!("malformed record: {e}")))?;
        rows.push(record.iter().map(|c| c.to_owned()).collect_vec());
    }
    Ok(Table::new(columns, rows))
}

/// Parse a year cell. Accepts plain integers and float-shaped values such
/// as `2019.0`; blank or unparseable cells yield `None`.
pub fn parse_year(cell: &str) -> Option<Year> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse::<Year>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as Year)
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::errors::{DataLoadError, SchemaError};
    use std::io::Write;

    fn write_fixture(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_utf8() {
        let file = write_fixture(b"A,B\n1,2\n3,4\n");
        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.columns(), ["A", "B"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(1, 0), "3");
    }

    #[test]
    fn load_utf8_bom() {
        let file = write_fixture(b"\xef\xbb\xbfA,B\n1,2\n");
        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.columns(), ["A", "B"]);
    }

    #[test]
    fn load_euc_kr() {
        let text = "Author Keywords,Publication Year\n기계 학습,2020\n";
        let (bytes, _, had_errors) = EUC_KR.encode(text);
        assert!(!had_errors);
        let file = write_fixture(&bytes);
        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.cell(0, 0), "기계 학습");
    }

    #[test]
    fn load_missing_file() {
        let e = Table::load("/nonexistent/papers.csv").unwrap_err();
        assert!(e.downcast_ref::<DataLoadError>().is_some());
    }

    #[test]
    fn short_rows_are_padded() {
        let file = write_fixture(b"A,B,C\n1,2,3\n4\n");
        let table = Table::load(file.path()).unwrap();
        assert_eq!(table.cell(1, 0), "4");
        assert_eq!(table.cell(1, 2), "");
        assert_eq!(table.cell_opt(1, 2), None);
    }

    #[test]
    fn require_columns_names_all_missing() {
        let table = Table::new(vec!["A".to_owned()], vec![]);
        let e = table.require_columns(&["A", "B", "C"]).unwrap_err();
        let schema = e.downcast_ref::<SchemaError>().unwrap();
        assert_eq!(schema.0, ["B", "C"]);
        assert_eq!(e.to_string(), "missing required columns: B, C");
    }

    #[test]
    fn parse_year_basic() {
        assert_eq!(parse_year("2019"), Some(2019));
        assert_eq!(parse_year(" 2019 "), Some(2019));
        assert_eq!(parse_year("2019.0"), Some(2019));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("n/a"), None);
        assert_eq!(parse_year("2019.5"), None);
    }
}
