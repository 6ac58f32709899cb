//! Conversion gateway
//!
//! Maps user-facing conversion settings (source script, target script,
//! regional variant, phrase localization) onto the closed set of OpenCC
//! conversion modes, and hides the conversion backend behind the
//! [`TextConverter`] trait so the batch pipeline never touches it directly.

pub mod opencc;

pub use opencc::OpenccConverter;

use crate::error::ConverterInitError;

/// Chinese script families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Simplified,
    Traditional,
}

impl Script {
    pub fn as_str(&self) -> &'static str {
        match self {
            Script::Simplified => "simplified",
            Script::Traditional => "traditional",
        }
    }
}

/// Regional character-form standard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// OpenCC standard forms (no regional adjustment)
    Standard,
    Hongkong,
    Taiwan,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Standard => "standard",
            Variant::Hongkong => "hongkong",
            Variant::Taiwan => "taiwan",
        }
    }
}

/// The closed set of supported conversion modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionMode {
    S2t,
    S2tw,
    S2twp,
    S2hk,
    Tw2s,
    Tw2sp,
    Hk2s,
    T2s,
    T2tw,
    T2hk,
}

impl ConversionMode {
    /// All modes, in the order of the resolution table
    pub const ALL: [ConversionMode; 10] = [
        ConversionMode::S2t,
        ConversionMode::S2hk,
        ConversionMode::S2tw,
        ConversionMode::S2twp,
        ConversionMode::T2s,
        ConversionMode::Hk2s,
        ConversionMode::Tw2s,
        ConversionMode::Tw2sp,
        ConversionMode::T2tw,
        ConversionMode::T2hk,
    ];

    /// Short mode code, also used in derived output filenames
    pub fn code(&self) -> &'static str {
        match self {
            ConversionMode::S2t => "s2t",
            ConversionMode::S2tw => "s2tw",
            ConversionMode::S2twp => "s2twp",
            ConversionMode::S2hk => "s2hk",
            ConversionMode::Tw2s => "tw2s",
            ConversionMode::Tw2sp => "tw2sp",
            ConversionMode::Hk2s => "hk2s",
            ConversionMode::T2s => "t2s",
            ConversionMode::T2tw => "t2tw",
            ConversionMode::T2hk => "t2hk",
        }
    }

    /// OpenCC configuration name for this mode
    pub fn config_name(&self) -> &'static str {
        match self {
            ConversionMode::S2t => "s2t.json",
            ConversionMode::S2tw => "s2tw.json",
            ConversionMode::S2twp => "s2twp.json",
            ConversionMode::S2hk => "s2hk.json",
            ConversionMode::Tw2s => "tw2s.json",
            ConversionMode::Tw2sp => "tw2sp.json",
            ConversionMode::Hk2s => "hk2s.json",
            ConversionMode::T2s => "t2s.json",
            ConversionMode::T2tw => "t2tw.json",
            ConversionMode::T2hk => "t2hk.json",
        }
    }
}

/// User-facing conversion settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionSettings {
    pub source: Script,
    pub target: Script,
    pub variant: Variant,
    /// Substitute region-specific vocabulary, not just character forms
    pub phrases: bool,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            source: Script::Simplified,
            target: Script::Traditional,
            variant: Variant::Taiwan,
            phrases: true,
        }
    }
}

impl ConversionSettings {
    pub fn new(source: Script, target: Script, variant: Variant, phrases: bool) -> Self {
        Self {
            source,
            target,
            variant,
            phrases,
        }
    }

    /// Resolve the settings to a conversion mode.
    ///
    /// Returns `None` for the identity cases: simplified to simplified with
    /// any variant, and traditional to traditional with the standard
    /// variant. The latter used to fall back to a traditional-to-simplified
    /// conversion, which reversed the requested direction; treating it as a
    /// no-op preserves the user's text.
    pub fn resolve_mode(&self) -> Option<ConversionMode> {
        match (self.source, self.target, self.variant) {
            (Script::Simplified, Script::Traditional, Variant::Taiwan) => Some(if self.phrases {
                ConversionMode::S2twp
            } else {
                ConversionMode::S2tw
            }),
            (Script::Simplified, Script::Traditional, Variant::Hongkong) => {
                Some(ConversionMode::S2hk)
            }
            (Script::Simplified, Script::Traditional, Variant::Standard) => {
                Some(ConversionMode::S2t)
            }
            (Script::Traditional, Script::Simplified, Variant::Taiwan) => Some(if self.phrases {
                ConversionMode::Tw2sp
            } else {
                ConversionMode::Tw2s
            }),
            (Script::Traditional, Script::Simplified, Variant::Hongkong) => {
                Some(ConversionMode::Hk2s)
            }
            (Script::Traditional, Script::Simplified, Variant::Standard) => {
                Some(ConversionMode::T2s)
            }
            (Script::Traditional, Script::Traditional, Variant::Taiwan) => {
                Some(ConversionMode::T2tw)
            }
            (Script::Traditional, Script::Traditional, Variant::Hongkong) => {
                Some(ConversionMode::T2hk)
            }
            (Script::Traditional, Script::Traditional, Variant::Standard) => None,
            (Script::Simplified, Script::Simplified, _) => None,
        }
    }

    /// Label used in derived output filenames: the mode code, or a fixed
    /// marker for the identity cases.
    pub fn file_label(&self) -> &'static str {
        match self.resolve_mode() {
            Some(mode) => mode.code(),
            None => match (self.source, self.target) {
                (Script::Simplified, Script::Simplified) => "简体",
                (Script::Traditional, Script::Traditional) => "t2t",
                _ => "convert",
            },
        }
    }

    /// Human-readable settings summary for status lines
    pub fn describe(&self) -> String {
        match self.resolve_mode() {
            Some(mode) => format!(
                "{} -> {} ({}{})",
                self.source.as_str(),
                self.target.as_str(),
                mode.code(),
                if self.phrases && matches!(self.variant, Variant::Taiwan) {
                    ", phrases"
                } else {
                    ""
                }
            ),
            None => format!(
                "{} -> {} (no conversion needed)",
                self.source.as_str(),
                self.target.as_str()
            ),
        }
    }
}

/// Capability seam for the text-conversion backend.
///
/// One converter instance is constructed per run and reused for every unit;
/// construction carries the expensive dictionary setup, `convert` is the
/// cheap per-unit call.
pub trait TextConverter {
    fn convert(&self, text: &str) -> anyhow::Result<String>;
}

/// Build the backend converter for the given settings.
///
/// `Ok(None)` means the settings resolve to the identity: no converter is
/// needed and the output equals the input.
pub fn build_converter(
    settings: &ConversionSettings,
) -> Result<Option<OpenccConverter>, ConverterInitError> {
    match settings.resolve_mode() {
        Some(mode) => Ok(Some(OpenccConverter::new(mode)?)),
        None => Ok(None),
    }
}
