//! File loading: extension-dispatched parsing into the content model

use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xls, Xlsx};
use docx_rs::{
    read_docx, DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent,
    TableChild, TableRowChild,
};
use tracing::{debug, info};

use crate::content::{CellValue, ContentModel, DocumentData, FileKind, TabularData};
use crate::error::LoadError;

/// Load a file into the content model matching its extension.
pub fn load(path: &Path) -> Result<ContentModel, LoadError> {
    let kind = FileKind::detect(path);
    let model = match kind {
        FileKind::Tabular => ContentModel::Tabular(load_tabular(path)?),
        FileKind::Document => ContentModel::Document(load_document(path)?),
        FileKind::PlainText => ContentModel::PlainText(load_plain_text(path)?),
    };
    info!(path = %path.display(), kind = model.kind_name(), "loaded input file");
    Ok(model)
}

fn load_tabular(path: &Path) -> Result<TabularData, LoadError> {
    let is_xls = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("xls"))
        .unwrap_or(false);

    if is_xls {
        let mut workbook = open_workbook::<Xls<_>, _>(path)
            .map_err(|e| LoadError::workbook(path.to_path_buf(), e.to_string()))?;
        first_sheet_to_tabular(&mut workbook, path)
    } else {
        let mut workbook = open_workbook::<Xlsx<_>, _>(path)
            .map_err(|e| LoadError::workbook(path.to_path_buf(), e.to_string()))?;
        first_sheet_to_tabular(&mut workbook, path)
    }
}

/// Read the first worksheet: first row becomes the header, the rest become
/// cell rows padded to the header width.
fn first_sheet_to_tabular<RS, R>(workbook: &mut R, path: &Path) -> Result<TabularData, LoadError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    let sheet_names = workbook.sheet_names();
    let first_sheet = sheet_names
        .first()
        .ok_or_else(|| LoadError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .to_string();

    let range = workbook
        .worksheet_range(&first_sheet)
        .map_err(|e| LoadError::workbook(path.to_path_buf(), e.to_string()))?;

    let mut rows_iter = range.rows();
    let columns = match rows_iter.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| header_name(cell, i))
            .collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<CellValue>> = rows_iter
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    debug!(
        sheet = %first_sheet,
        columns = columns.len(),
        rows = rows.len(),
        "read worksheet"
    );
    Ok(TabularData::new(columns, rows))
}

fn header_name(cell: &Data, index: usize) -> String {
    let name = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    };
    if name.is_empty() {
        format!("column_{}", index + 1)
    } else {
        name
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::Text(other.to_string()),
    }
}

fn load_document(path: &Path) -> Result<DocumentData, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::io(path.to_path_buf(), e.to_string()))?;
    let docx =
        read_docx(&bytes).map_err(|e| LoadError::document(path.to_path_buf(), e.to_string()))?;

    let mut data = DocumentData::default();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => {
                data.paragraphs.push(paragraph_text(paragraph));
            }
            DocumentChild::Table(table) => {
                data.tables.push(table_cells(table));
            }
            _ => {}
        }
    }
    debug!(
        paragraphs = data.paragraphs.len(),
        tables = data.tables.len(),
        "read document"
    );
    Ok(data)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn table_cells(table: &Table) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for row_child in &table.rows {
        #[allow(irrefutable_let_patterns)]
        if let TableChild::TableRow(row) = row_child {
            let mut cells = Vec::new();
            for cell_child in &row.cells {
                #[allow(irrefutable_let_patterns)]
                if let TableRowChild::TableCell(cell) = cell_child {
                    let mut parts = Vec::new();
                    for content in &cell.children {
                        if let TableCellContent::Paragraph(paragraph) = content {
                            parts.push(paragraph_text(paragraph));
                        }
                    }
                    cells.push(parts.join("\n"));
                }
            }
            rows.push(cells);
        }
    }
    rows
}

fn load_plain_text(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|e| LoadError::io(path.to_path_buf(), e.to_string()))
}
