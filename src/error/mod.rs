//! Error types and handling infrastructure for the conversion pipeline

use std::path::PathBuf;

use crate::conversion::progress::ProgressState;

/// Converter backend construction failures
#[derive(Debug, thiserror::Error)]
pub enum ConverterInitError {
    #[error("conversion mode '{mode}' failed to initialize: {message}")]
    Backend { mode: &'static str, message: String },
}

impl ConverterInitError {
    pub fn backend(mode: &'static str, message: String) -> Self {
        Self::Backend { mode, message }
    }
}

/// Input file loading failures
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("failed to open workbook '{}': {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("workbook '{}' has no worksheets", .path.display())]
    NoWorksheet { path: PathBuf },

    #[error("failed to read document '{}': {message}", .path.display())]
    Document { path: PathBuf, message: String },
}

impl LoadError {
    pub fn io(path: PathBuf, message: String) -> Self {
        Self::Io { path, message }
    }

    pub fn workbook(path: PathBuf, message: String) -> Self {
        Self::Workbook { path, message }
    }

    pub fn document(path: PathBuf, message: String) -> Self {
        Self::Document { path, message }
    }
}

/// A unit failed to convert mid-run. The run aborts at the first failure,
/// so `progress` reflects how far the traversal got; no output is written.
#[derive(Debug, thiserror::Error)]
#[error("conversion failed at unit {}/{} ({}): {message}",
    .progress.completed_units, .progress.total_units, .progress.current_label)]
pub struct ConversionError {
    pub progress: ProgressState,
    pub message: String,
}

impl ConversionError {
    pub fn new(progress: ProgressState, message: String) -> Self {
        Self { progress, message }
    }
}

/// Output serialization/write failures
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to write '{}': {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("failed to build workbook '{}': {message}", .path.display())]
    Workbook { path: PathBuf, message: String },

    #[error("failed to build document '{}': {message}", .path.display())]
    Document { path: PathBuf, message: String },
}

impl SaveError {
    pub fn io(path: PathBuf, message: String) -> Self {
        Self::Io { path, message }
    }

    pub fn workbook(path: PathBuf, message: String) -> Self {
        Self::Workbook { path, message }
    }

    pub fn document(path: PathBuf, message: String) -> Self {
        Self::Document { path, message }
    }
}

/// Main error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Init(#[from] ConverterInitError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConvertError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Init(err) => format!("Converter error: {}", err),
            Self::Load(err) => format!("File error: {}", err),
            Self::Conversion(err) => format!("Conversion error: {}", err),
            Self::Save(err) => format!("Save error: {}", err),
            Self::Usage(message) => message.clone(),
            Self::Other(err) => format!("Unexpected error: {}", err),
        }
    }
}

/// Result type for pipeline operations
pub type ConvertResult<T> = Result<T, ConvertError>;
