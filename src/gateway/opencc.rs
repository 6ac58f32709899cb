//! OpenCC-backed conversion capability

use ferrous_opencc::config::BuiltinConfig;
use ferrous_opencc::OpenCC;

use crate::error::ConverterInitError;
use crate::gateway::{ConversionMode, TextConverter};

/// Text converter backed by the bundled OpenCC dictionaries.
///
/// Construction loads the dictionary chain for the mode, which is the
/// expensive part; the instance is then reused for every unit of a run.
pub struct OpenccConverter {
    mode: ConversionMode,
    backend: OpenCC,
}

impl OpenccConverter {
    pub fn new(mode: ConversionMode) -> Result<Self, ConverterInitError> {
        let config = BuiltinConfig::from_filename(mode.config_name())
            .map_err(|e| ConverterInitError::backend(mode.code(), e.to_string()))?;
        let backend = OpenCC::from_config(config)
            .map_err(|e| ConverterInitError::backend(mode.code(), e.to_string()))?;
        Ok(Self { mode, backend })
    }

    pub fn mode(&self) -> ConversionMode {
        self.mode
    }
}

impl TextConverter for OpenccConverter {
    fn convert(&self, text: &str) -> anyhow::Result<String> {
        Ok(self.backend.convert(text))
    }
}

impl std::fmt::Debug for OpenccConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenccConverter")
            .field("mode", &self.mode)
            .finish()
    }
}
