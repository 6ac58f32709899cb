//! Batch converter: walks convertible units in a fixed order, applies the
//! converter to each non-blank unit, and reports progress after every unit.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;

use tracing::{debug, info};

use crate::content::{
    CellValue, ColumnSelection, ContentModel, DocumentData, TabularData,
};
use crate::conversion::progress::{ChannelSink, ProgressSink, ProgressState, RunEvent};
use crate::conversion::stats::RunStats;
use crate::error::{ConversionError, ConvertError, ConvertResult};
use crate::gateway::{build_converter, ConversionSettings, TextConverter};

/// Applies a text converter across every in-scope unit of a content model.
///
/// The output always has the same shape as the input: same column set and
/// row count, same paragraph/table/cell counts, same buffer boundaries.
/// Only unit text changes. A `None` converter is the identity: the run
/// completes immediately with the input cloned through.
pub struct BatchConverter<'a> {
    converter: Option<&'a dyn TextConverter>,
}

impl<'a> BatchConverter<'a> {
    pub fn new(converter: Option<&'a dyn TextConverter>) -> Self {
        Self { converter }
    }

    /// Run the full conversion, emitting one progress event per unit.
    ///
    /// Fails fast: the first unit that the converter rejects aborts the run
    /// with the partially-completed progress attached, and no output model
    /// is produced.
    pub fn run(
        &self,
        model: &ContentModel,
        selection: &ColumnSelection,
        sink: &mut dyn ProgressSink,
    ) -> ConvertResult<(ContentModel, RunStats)> {
        if let ContentModel::Tabular(data) = model {
            if selection.is_empty() {
                return Err(ConvertError::usage(format!(
                    "select at least one column to convert; available columns: {}",
                    data.columns().join(", ")
                )));
            }
            selection.validate_against(data)?;
        }

        let started = Instant::now();
        let total = model.total_units(selection);
        let mut progress = ProgressState::begin(total);
        let mut stats = RunStats::begin(total);

        let converter = match self.converter {
            Some(converter) => converter,
            None => {
                // Identity settings: every unit would be a pass-through
                // copy, so complete in one step with the input unchanged.
                progress.completed_units = total;
                progress.current_label = "no conversion needed".to_string();
                sink.on_progress(&progress);
                stats.skipped_units = total;
                info!(units = total, "identity run, content copied through");
                return Ok((model.clone(), stats.finish(started)));
            }
        };

        let output = match model {
            ContentModel::Tabular(data) => ContentModel::Tabular(self.run_tabular(
                data,
                selection,
                converter,
                &mut progress,
                &mut stats,
                sink,
            )?),
            ContentModel::Document(data) => ContentModel::Document(self.run_document(
                data,
                converter,
                &mut progress,
                &mut stats,
                sink,
            )?),
            ContentModel::PlainText(text) => ContentModel::PlainText(self.run_plain_text(
                text,
                converter,
                &mut progress,
                &mut stats,
                sink,
            )?),
        };

        debug_assert!(progress.is_finished());
        info!(
            units = total,
            converted = stats.converted_units,
            "batch conversion finished"
        );
        Ok((output, stats.finish(started)))
    }

    /// Columns in selection order, rows top-to-bottom within each column.
    fn run_tabular(
        &self,
        data: &TabularData,
        selection: &ColumnSelection,
        converter: &dyn TextConverter,
        progress: &mut ProgressState,
        stats: &mut RunStats,
        sink: &mut dyn ProgressSink,
    ) -> ConvertResult<TabularData> {
        let mut output = data.clone();
        for name in selection.iter() {
            // Validated above, so the index always resolves
            let col = match data.column_index(name) {
                Some(col) => col,
                None => continue,
            };
            for row in 0..data.row_count() {
                let cell = &data.rows()[row][col];
                if let Some(text) = cell.as_text() {
                    if cell.is_blank() {
                        stats.record_skipped();
                    } else {
                        let converted = self.convert_unit(converter, text, progress)?;
                        output.set_cell(row, col, CellValue::Text(converted));
                        stats.record_converted();
                    }
                } else {
                    stats.record_skipped();
                }
                progress.advance(format!("column '{}', row {}", name, row + 1));
                sink.on_progress(progress);
            }
        }
        Ok(output)
    }

    /// Paragraphs first, then tables top-to-bottom, rows top-to-bottom,
    /// cells left-to-right.
    fn run_document(
        &self,
        data: &DocumentData,
        converter: &dyn TextConverter,
        progress: &mut ProgressState,
        stats: &mut RunStats,
        sink: &mut dyn ProgressSink,
    ) -> ConvertResult<DocumentData> {
        let mut output = data.clone();
        let paragraph_count = data.paragraphs.len();

        for (i, paragraph) in data.paragraphs.iter().enumerate() {
            if paragraph.trim().is_empty() {
                stats.record_skipped();
            } else {
                output.paragraphs[i] = self.convert_unit(converter, paragraph, progress)?;
                stats.record_converted();
            }
            progress.advance(format!("paragraph {}/{}", i + 1, paragraph_count));
            sink.on_progress(progress);
        }

        for (t, table) in data.tables.iter().enumerate() {
            for (r, row) in table.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if cell.trim().is_empty() {
                        stats.record_skipped();
                    } else {
                        output.tables[t][r][c] = self.convert_unit(converter, cell, progress)?;
                        stats.record_converted();
                    }
                    progress.advance(format!("table {}, row {}, cell {}", t + 1, r + 1, c + 1));
                    sink.on_progress(progress);
                }
            }
        }
        Ok(output)
    }

    /// The whole buffer is one unit.
    fn run_plain_text(
        &self,
        text: &str,
        converter: &dyn TextConverter,
        progress: &mut ProgressState,
        stats: &mut RunStats,
        sink: &mut dyn ProgressSink,
    ) -> ConvertResult<String> {
        let output = if text.trim().is_empty() {
            stats.record_skipped();
            text.to_string()
        } else {
            let converted = self.convert_unit(converter, text, progress)?;
            stats.record_converted();
            converted
        };
        progress.advance("text buffer".to_string());
        sink.on_progress(progress);
        Ok(output)
    }

    fn convert_unit(
        &self,
        converter: &dyn TextConverter,
        text: &str,
        progress: &ProgressState,
    ) -> ConvertResult<String> {
        converter
            .convert(text)
            .map_err(|e| ConversionError::new(progress.clone(), e.to_string()).into())
    }
}

/// Run the batch conversion on a background worker thread.
///
/// The caller keeps the receiving end of `tx`'s channel and observes
/// progress events in emission order followed by exactly one terminal
/// event. The converter is constructed on the worker so the expensive
/// dictionary setup never blocks the calling thread.
pub fn spawn_run(
    model: ContentModel,
    settings: ConversionSettings,
    selection: ColumnSelection,
    tx: Sender<RunEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        debug!(settings = %settings.describe(), "worker run starting");
        let converter = match build_converter(&settings) {
            Ok(converter) => converter,
            Err(e) => {
                let _ = tx.send(RunEvent::Failed(e.into()));
                return;
            }
        };

        let batch = BatchConverter::new(converter.as_ref().map(|c| c as &dyn TextConverter));
        let mut sink = ChannelSink::new(tx.clone());
        match batch.run(&model, &selection, &mut sink) {
            Ok((model, stats)) => {
                let _ = tx.send(RunEvent::Finished { model, stats });
            }
            Err(e) => {
                let _ = tx.send(RunEvent::Failed(e));
            }
        }
    })
}
