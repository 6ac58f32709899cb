//! Bounded synchronous preview
//!
//! Runs the same per-unit conversion as the batch converter, but over a
//! bounded copy of the content (first rows / first characters) so it is
//! cheap enough to recompute on every settings change. Pure: never mutates
//! the loaded model and never touches the filesystem.

use anyhow::Context;

use crate::content::{ColumnSelection, ContentModel};
use crate::conversion::batch::BatchConverter;
use crate::conversion::progress::NullSink;
use crate::error::{ConvertError, ConvertResult};
use crate::gateway::TextConverter;

/// Bounds for the preview copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLimits {
    /// Tabular previews show at most this many rows
    pub max_rows: usize,
    /// Text and document previews show at most this many characters
    pub max_chars: usize,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_rows: 5,
            max_chars: 500,
        }
    }
}

/// What the preview decided to show
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewResult {
    /// No file loaded and no direct text supplied
    NoInput,
    /// A file is loaded but holds no content
    EmptyFile,
    /// Tabular input with nothing selected; lists what could be selected
    SelectColumn { available: Vec<String> },
    /// Converted text (direct input, document or plain-text preview)
    Text { converted: String },
    /// Converted preview rows for the selected columns only
    Tabular {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// Decide what to preview and produce it.
///
/// Priority is fixed: non-blank direct text wins over any loaded file;
/// then missing input, empty input and empty column selection surface as
/// sentinels; otherwise the bounded conversion runs.
pub fn preview(
    direct_text: Option<&str>,
    model: Option<&ContentModel>,
    converter: Option<&dyn TextConverter>,
    selection: &ColumnSelection,
    limits: &PreviewLimits,
) -> ConvertResult<PreviewResult> {
    if let Some(text) = direct_text {
        if !text.trim().is_empty() {
            return Ok(PreviewResult::Text {
                converted: convert_text(converter, text)?,
            });
        }
    }

    let model = match model {
        Some(model) => model,
        None => return Ok(PreviewResult::NoInput),
    };

    if model.is_empty() {
        return Ok(PreviewResult::EmptyFile);
    }

    match model {
        ContentModel::Tabular(data) => {
            if selection.is_empty() {
                return Ok(PreviewResult::SelectColumn {
                    available: data.columns().to_vec(),
                });
            }
            selection.validate_against(data)?;

            let bounded = ContentModel::Tabular(data.head(limits.max_rows));
            let batch = BatchConverter::new(converter);
            let (converted, _) = batch.run(&bounded, selection, &mut NullSink)?;
            let converted = match converted {
                ContentModel::Tabular(data) => data,
                _ => unreachable!("tabular input produces tabular output"),
            };

            let columns: Vec<String> = selection.iter().map(str::to_string).collect();
            let rows = converted
                .rows()
                .iter()
                .enumerate()
                .map(|(row, _)| {
                    selection
                        .iter()
                        .map(|name| {
                            converted
                                .cell(row, name)
                                .map(|cell| cell.display_string())
                                .unwrap_or_default()
                        })
                        .collect()
                })
                .collect();
            Ok(PreviewResult::Tabular { columns, rows })
        }
        ContentModel::Document(data) => {
            let sample = bounded_prefix(&data.joined_text(), limits.max_chars);
            Ok(PreviewResult::Text {
                converted: convert_text(converter, &sample)?,
            })
        }
        ContentModel::PlainText(text) => {
            let sample = bounded_prefix(text, limits.max_chars);
            Ok(PreviewResult::Text {
                converted: convert_text(converter, &sample)?,
            })
        }
    }
}

fn convert_text(converter: Option<&dyn TextConverter>, text: &str) -> ConvertResult<String> {
    match converter {
        Some(converter) => converter
            .convert(text)
            .context("preview conversion failed")
            .map_err(ConvertError::Other),
        None => Ok(text.to_string()),
    }
}

/// First `max_chars` characters, never splitting a code point
fn bounded_prefix(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
