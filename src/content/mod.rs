//! Content model for loaded files
//!
//! A loaded file is one of three shapes: tabular (spreadsheet), document
//! (paragraphs plus tables), or a plain text buffer. All three expose the
//! same notion of a convertible unit: a cell, a paragraph or table cell, or
//! the whole buffer.

pub mod loader;
pub mod saver;

pub use loader::load;
pub use saver::{derived_output_path, save};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

/// Missing-value marker carried over from spreadsheet exports
const MISSING_MARKER: &str = "nan";

/// Untyped cell scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Blank units are skipped by conversion and copied through unchanged:
    /// empty cells, whitespace-only text, and the literal missing marker.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => {
                let trimmed = text.trim();
                trimmed.is_empty() || trimmed == MISSING_MARKER
            }
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }

    /// Convertible text content, if any. Numbers and booleans carry no
    /// Chinese text and pass through conversion untouched.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Display form used by previews
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

/// Spreadsheet shape: named columns and index-aligned rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularData {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularData {
    /// Build a table, padding or truncating each row to the column count so
    /// the row-length invariant holds by construction.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        for row in &mut rows {
            row.resize(columns.len(), CellValue::Empty);
        }
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub(crate) fn set_cell(&mut self, row: usize, col: usize, value: CellValue) {
        self.rows[row][col] = value;
    }

    /// Bounded copy of the first `n` rows, same columns
    pub fn head(&self, n: usize) -> TabularData {
        TabularData {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Document shape: paragraphs in order, then tables in order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentData {
    pub paragraphs: Vec<String>,
    /// tables -> rows -> cell text
    pub tables: Vec<Vec<Vec<String>>>,
}

impl DocumentData {
    pub fn cell_count(&self) -> usize {
        self.tables
            .iter()
            .map(|table| table.iter().map(|row| row.len()).sum::<usize>())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty() && self.tables.is_empty()
    }

    /// All paragraph text joined, used for bounded text previews
    pub fn joined_text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// The loaded input, one of three shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentModel {
    Tabular(TabularData),
    Document(DocumentData),
    PlainText(String),
}

impl ContentModel {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ContentModel::Tabular(_) => "spreadsheet",
            ContentModel::Document(_) => "document",
            ContentModel::PlainText(_) => "text",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ContentModel::Tabular(data) => data.is_empty(),
            ContentModel::Document(data) => data.is_empty(),
            ContentModel::PlainText(text) => text.trim().is_empty(),
        }
    }

    /// Total convertible units for a full run over this model
    pub fn total_units(&self, selection: &ColumnSelection) -> usize {
        match self {
            ContentModel::Tabular(data) => data.row_count() * selection.len(),
            ContentModel::Document(data) => data.paragraphs.len() + data.cell_count(),
            ContentModel::PlainText(_) => 1,
        }
    }
}

/// User-chosen subset of tabular columns, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnSelection {
    names: Vec<String>,
}

impl ColumnSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every column of the table, in table order
    pub fn all_of(data: &TabularData) -> Self {
        let mut selection = Self::new();
        for column in data.columns() {
            selection.push(column.clone());
        }
        selection
    }

    pub fn push(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check the selection against the loaded columns. Unknown names are a
    /// usage error listing what is actually available.
    pub fn validate_against(&self, data: &TabularData) -> ConvertResult<()> {
        for name in self.iter() {
            if data.column_index(name).is_none() {
                return Err(ConvertError::usage(format!(
                    "unknown column '{}'; available columns: {}",
                    name,
                    data.columns().join(", ")
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<String> for ColumnSelection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut selection = Self::new();
        for name in iter {
            selection.push(name);
        }
        selection
    }
}

/// File classification by extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Tabular,
    Document,
    PlainText,
}

impl FileKind {
    /// `.xlsx`/`.xls` are spreadsheets, `.docx` is a document, everything
    /// else (including `.txt` and no extension) is treated as plain text.
    pub fn detect(path: &Path) -> FileKind {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("xlsx") | Some("xls") => FileKind::Tabular,
            Some("docx") => FileKind::Document,
            _ => FileKind::PlainText,
        }
    }
}
