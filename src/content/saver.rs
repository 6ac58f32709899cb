//! File saving: writes a content model back out in the shape it was loaded

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use docx_rs::{Docx, Paragraph, Run, Table, TableCell, TableRow};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::content::{CellValue, ContentModel, DocumentData, TabularData};
use crate::error::SaveError;
use crate::gateway::ConversionSettings;

/// Write the model to `path`, choosing the format from the model shape.
pub fn save(model: &ContentModel, path: &Path) -> Result<(), SaveError> {
    match model {
        ContentModel::Tabular(data) => save_tabular(data, path)?,
        ContentModel::Document(data) => save_document(data, path)?,
        ContentModel::PlainText(text) => {
            fs::write(path, text).map_err(|e| SaveError::io(path.to_path_buf(), e.to_string()))?
        }
    }
    info!(path = %path.display(), kind = model.kind_name(), "wrote output file");
    Ok(())
}

fn save_tabular(data: &TabularData, path: &Path) -> Result<(), SaveError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in data.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name.as_str())
            .map_err(|e| SaveError::workbook(path.to_path_buf(), e.to_string()))?;
    }

    for (row_idx, row) in data.rows().iter().enumerate() {
        let out_row = (row_idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let out_col = col as u16;
            let result = match cell {
                CellValue::Empty => continue,
                CellValue::Text(text) => worksheet.write_string(out_row, out_col, text.as_str()),
                CellValue::Number(n) => worksheet.write_number(out_row, out_col, *n),
                CellValue::Bool(b) => worksheet.write_boolean(out_row, out_col, *b),
            };
            result.map_err(|e| SaveError::workbook(path.to_path_buf(), e.to_string()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| SaveError::io(path.to_path_buf(), e.to_string()))
}

fn save_document(data: &DocumentData, path: &Path) -> Result<(), SaveError> {
    let mut docx = Docx::new();

    for paragraph in &data.paragraphs {
        docx = docx.add_paragraph(text_paragraph(paragraph));
    }

    for table in &data.tables {
        let rows: Vec<TableRow> = table
            .iter()
            .map(|row| {
                let cells: Vec<TableCell> = row.iter().map(|text| text_cell(text)).collect();
                TableRow::new(cells)
            })
            .collect();
        docx = docx.add_table(Table::new(rows));
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| SaveError::document(path.to_path_buf(), e.to_string()))?;
    fs::write(path, cursor.into_inner())
        .map_err(|e| SaveError::io(path.to_path_buf(), e.to_string()))
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

/// Cells loaded from multi-paragraph table cells carry embedded newlines;
/// split them back into one paragraph per line.
fn text_cell(text: &str) -> TableCell {
    let mut cell = TableCell::new();
    for line in text.split('\n') {
        cell = cell.add_paragraph(text_paragraph(line));
    }
    cell
}

/// Default output path: `{stem}_{label}{ext}` next to the input, where the
/// label is the mode code (or the fixed identity marker).
pub fn derived_output_path(input: &Path, settings: &ConversionSettings) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("converted");
    let ext = input
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();
    let name = format!("{}_{}{}", stem, settings.file_label(), ext);
    input.with_file_name(name)
}
