//! occonv - Chinese Script Batch Converter
//!
//! A Rust library and CLI tool for converting Chinese text between script
//! variants (simplified/traditional, Hong Kong/Taiwan standards, optional
//! phrase localization) across spreadsheet, document and plain-text files.

// Allow dead code for library exports that may not be used by the binary yet
#![allow(dead_code)]

pub mod cli;
pub mod content;
pub mod conversion;
pub mod error;
pub mod gateway;

// Re-export commonly used types
pub use content::{CellValue, ColumnSelection, ContentModel, DocumentData, FileKind, TabularData};
pub use conversion::{
    preview, spawn_run, BatchConverter, PreviewLimits, PreviewResult, ProgressSink, ProgressState,
    RunEvent, RunStats,
};
pub use error::{ConversionError, ConvertError, ConvertResult, LoadError, SaveError};
pub use gateway::{ConversionMode, ConversionSettings, Script, TextConverter, Variant};

use std::path::{Path, PathBuf};

use crate::conversion::progress::NullSink;

/// Convert a text snippet with the given settings.
///
/// Identity settings return the input unchanged.
pub fn convert_text(text: &str, settings: &ConversionSettings) -> ConvertResult<String> {
    match gateway::build_converter(settings)? {
        Some(converter) => converter
            .convert(text)
            .map_err(ConvertError::Other),
        None => Ok(text.to_string()),
    }
}

/// Convert a whole file synchronously: load, convert every in-scope unit,
/// write the result. Returns the output path and the run statistics.
///
/// `output` defaults to the `{stem}_{label}{ext}` convention next to the
/// input. Progress is reported through `sink` after every unit.
pub fn convert_file(
    input: &Path,
    output: Option<&Path>,
    settings: &ConversionSettings,
    selection: &ColumnSelection,
    sink: &mut dyn ProgressSink,
) -> ConvertResult<(PathBuf, RunStats)> {
    let model = content::load(input)?;
    let converter = gateway::build_converter(settings)?;

    let batch = BatchConverter::new(converter.as_ref().map(|c| c as &dyn TextConverter));
    let (converted, stats) = batch.run(&model, selection, sink)?;

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => content::derived_output_path(input, settings),
    };
    content::save(&converted, &output_path)?;
    Ok((output_path, stats))
}

/// Convenience wrapper over [`convert_file`] without progress reporting.
pub fn convert_file_quiet(
    input: &Path,
    output: Option<&Path>,
    settings: &ConversionSettings,
    selection: &ColumnSelection,
) -> ConvertResult<(PathBuf, RunStats)> {
    convert_file(input, output, settings, selection, &mut NullSink)
}
