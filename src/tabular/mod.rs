//! This module handles tabular data (a header row followed by data rows), as exported by spreadsheets
//!
//! Spreadsheets have no fixed schema, so [`columns`] guesses which column holds what

mod parser;
pub use parser::parse_tsv;
pub mod columns;
pub use columns::{infer_columns, ColumnGuess};

/// A header and its data rows.
///
/// Rows may be shorter (or longer) than the header: missing cells are read as empty strings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Build a table from raw rows: fully blank rows are discarded, the first remaining row is the header
    pub fn from_raw_rows(raw_rows: Vec<Vec<String>>) -> Self {
        let mut rows = raw_rows.into_iter()
            .filter(|row| row.iter().any(|cell| cell.trim().is_empty() == false));

        let header = match rows.next() {
            None => return Self::default(),
            Some(h) => h.iter()
                .map(|label| label.replace('\u{FEFF}', "").trim().to_string())
                .collect(),
        };

        Self { header, rows: rows.collect() }
    }

    pub fn header(&self) -> &[String]    { &self.header }
    pub fn rows(&self) -> &[Vec<String>] { &self.rows   }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }

    /// The cell at (row, column), or an empty string if this row is too short
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows.get(row)
            .and_then(|r| r.get(column))
            .map(|c| c.as_str())
            .unwrap_or("")
    }
}
