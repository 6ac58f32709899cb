//! Command-line interface module

use clap::{Parser, ValueEnum};
use console::style;
use std::path::PathBuf;

use crate::conversion::{PreviewLimits, PreviewResult};
use crate::error::{ConvertError, ConvertResult};
use crate::gateway::{ConversionSettings, Script, Variant};

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "occonv")]
#[command(about = "Convert Chinese text in spreadsheet, document and text files between script variants")]
#[command(version = "0.1.0")]
#[command(long_about = None)]
pub struct Args {
    /// Input file (.xlsx, .xls, .docx, .txt or any text file)
    #[arg()]
    pub input: Option<PathBuf>,

    /// Output file path (default: <stem>_<mode><ext> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source script of the input text
    #[arg(long, value_enum, default_value_t = ScriptArg::Simplified)]
    pub source: ScriptArg,

    /// Target script for the output text
    #[arg(long, value_enum, default_value_t = ScriptArg::Traditional)]
    pub target: ScriptArg,

    /// Regional character-form standard
    #[arg(long, value_enum, default_value_t = VariantArg::Taiwan)]
    pub variant: VariantArg,

    /// Disable region-specific phrase substitution
    #[arg(long)]
    pub no_phrases: bool,

    /// Spreadsheet columns to convert (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Convert every column of a spreadsheet input
    #[arg(long, conflicts_with = "columns")]
    pub all_columns: bool,

    /// Convert the given text directly and print the result
    #[arg(long)]
    pub text: Option<String>,

    /// Show a bounded preview instead of converting the whole file
    #[arg(long)]
    pub preview: bool,

    /// Maximum rows shown in a spreadsheet preview
    #[arg(long, default_value_t = 5)]
    pub max_rows: usize,

    /// Maximum characters shown in a text preview
    #[arg(long, default_value_t = 500)]
    pub max_chars: usize,

    /// Output run statistics after conversion
    #[arg(long)]
    pub stats: bool,

    /// Enable verbose logging
    #[arg(long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(long)]
    pub quiet: bool,
}

/// Script choices for the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptArg {
    Simplified,
    Traditional,
}

impl From<ScriptArg> for Script {
    fn from(script: ScriptArg) -> Self {
        match script {
            ScriptArg::Simplified => Script::Simplified,
            ScriptArg::Traditional => Script::Traditional,
        }
    }
}

impl std::fmt::Display for ScriptArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScriptArg::Simplified => "simplified",
            ScriptArg::Traditional => "traditional",
        };
        write!(f, "{}", name)
    }
}

/// Variant choices for the CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantArg {
    /// OpenCC standard forms
    #[value(name = "standard", alias = "none")]
    Standard,
    Hongkong,
    Taiwan,
}

impl From<VariantArg> for Variant {
    fn from(variant: VariantArg) -> Self {
        match variant {
            VariantArg::Standard => Variant::Standard,
            VariantArg::Hongkong => Variant::Hongkong,
            VariantArg::Taiwan => Variant::Taiwan,
        }
    }
}

impl std::fmt::Display for VariantArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VariantArg::Standard => "standard",
            VariantArg::Hongkong => "hongkong",
            VariantArg::Taiwan => "taiwan",
        };
        write!(f, "{}", name)
    }
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub settings: ConversionSettings,
    pub limits: PreviewLimits,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConvertResult<Self> {
        if args.input.is_none() && args.text.is_none() {
            return Err(ConvertError::usage(
                "no input provided; pass a file path or use --text",
            ));
        }

        let settings = ConversionSettings::new(
            args.source.into(),
            args.target.into(),
            args.variant.into(),
            !args.no_phrases,
        );

        let limits = PreviewLimits {
            max_rows: args.max_rows,
            max_chars: args.max_chars,
        };

        Ok(Self {
            args,
            settings,
            limits,
        })
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.args.quiet
    }

    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.args.verbose
    }

    /// Check if stats output is requested
    pub fn want_stats(&self) -> bool {
        self.args.stats
    }
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Create a progress bar for a batch run
    pub fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
        let pb = indicatif::ProgressBar::new(total);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    }

    /// Show a success message (if not in quiet mode)
    pub fn show_success(message: &str, quiet: bool) {
        if !quiet {
            println!("✓ {}", message);
        }
    }

    /// Show an error message
    pub fn show_error(message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Show a warning message (if not in quiet mode)
    pub fn show_warning(message: &str, quiet: bool) {
        if !quiet {
            eprintln!("⚠ {}", message);
        }
    }

    /// Check if output should be colored
    pub fn should_use_color() -> bool {
        atty::is(atty::Stream::Stdout) && std::env::var("NO_COLOR").is_err()
    }

    /// Get the terminal width, with a sane fallback
    pub fn terminal_width() -> usize {
        terminal_size::terminal_size()
            .map(|(width, _)| width.0 as usize)
            .unwrap_or(80)
    }
}

/// Per-cell display cap in tabular previews
const PREVIEW_CELL_WIDTH: usize = 15;

/// Render a preview result for the terminal.
pub fn render_preview(result: &PreviewResult) -> String {
    let width = CliUtils::terminal_width();
    match result {
        PreviewResult::NoInput => {
            "No input provided. Pass a file path or use --text.".to_string()
        }
        PreviewResult::EmptyFile => "The file is empty or has no data.".to_string(),
        PreviewResult::SelectColumn { available } => format!(
            "Select at least one column to convert (--columns or --all-columns).\n\nAvailable columns: {}",
            available.join(", ")
        ),
        PreviewResult::Text { converted } => converted.clone(),
        PreviewResult::Tabular { columns, rows } => {
            let mut out = String::new();
            if columns.len() == 1 {
                out.push_str(&format!(
                    "{}\n{}\n",
                    style(format!("Column '{}' (first {} rows):", columns[0], rows.len())).dim(),
                    "=".repeat(40.min(width))
                ));
                for row in rows {
                    out.push_str(&row[0]);
                    out.push('\n');
                }
            } else {
                out.push_str(&format!(
                    "{}\n{}\n",
                    style(format!(
                        "{} columns (first {} rows):",
                        columns.len(),
                        rows.len()
                    ))
                    .dim(),
                    "=".repeat(50.min(width))
                ));
                let header: Vec<String> =
                    columns.iter().map(|c| clip_cell(c)).collect();
                out.push_str(&header.join(" | "));
                out.push('\n');
                out.push_str(&"-".repeat(50.min(width)));
                out.push('\n');
                for row in rows {
                    let cells: Vec<String> = row.iter().map(|c| clip_cell(c)).collect();
                    let line = cells.join(" | ");
                    out.push_str(&console::truncate_str(&line, width, "...").to_string());
                    out.push('\n');
                }
            }
            out
        }
    }
}

fn clip_cell(value: &str) -> String {
    console::truncate_str(value, PREVIEW_CELL_WIDTH, "...").to_string()
}

/// Handle CLI errors with user-friendly messages
pub fn handle_error(error: &ConvertError) {
    CliUtils::show_error(&error.user_message());

    // Provide helpful suggestions
    match error {
        ConvertError::Usage(message) if message.contains("column") => {
            eprintln!("\nTip: pass --columns name1,name2 or --all-columns for spreadsheet inputs");
        }
        ConvertError::Load(_) => {
            eprintln!("\nTip: supported inputs are .xlsx, .xls, .docx and UTF-8 text files");
        }
        ConvertError::Init(_) => {
            eprintln!("\nTip: check the --source/--target/--variant combination");
        }
        _ => {}
    }

    eprintln!("\nTry 'occonv --help' for usage information.");
}
