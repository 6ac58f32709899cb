// Allow dead code for features exported but not yet used by the CLI
#![allow(dead_code)]

use clap::Parser;
use std::path::PathBuf;
use std::sync::mpsc;

mod cli;
mod content;
mod conversion;
mod error;
mod gateway;

use crate::cli::{render_preview, Args, CliConfig, CliUtils};
use crate::content::{ColumnSelection, ContentModel};
use crate::conversion::{preview, spawn_run, RunEvent};
use crate::error::{ConvertError, ConvertResult};
use crate::gateway::{build_converter, TextConverter};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        cli::handle_error(&e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    let _ = tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(CliUtils::should_use_color())
        .try_init();
}

fn run(args: Args) -> ConvertResult<()> {
    let config = CliConfig::from_args(args)?;

    if config.args.text.is_some() || config.args.preview {
        handle_preview(&config)
    } else {
        handle_conversion(&config)
    }
}

/// Direct text conversion and bounded file previews share one synchronous
/// path: the preview generator applies the same per-unit logic as the full
/// batch and decides what to show by its fixed priority order.
fn handle_preview(config: &CliConfig) -> ConvertResult<()> {
    let model = match &config.args.input {
        Some(path) => Some(content::load(path)?),
        None => None,
    };
    let selection = resolve_selection(&config.args, model.as_ref());

    let converter = build_converter(&config.settings)?;
    let result = preview(
        config.args.text.as_deref(),
        model.as_ref(),
        converter.as_ref().map(|c| c as &dyn TextConverter),
        &selection,
        &config.limits,
    )?;

    println!("{}", render_preview(&result));
    Ok(())
}

/// Full batch conversion: snapshot the model, hand it to a worker thread,
/// and drain progress events on this thread until the terminal event.
fn handle_conversion(config: &CliConfig) -> ConvertResult<()> {
    let input = match config.args.input.clone() {
        Some(path) => path,
        None => return Err(ConvertError::usage("no input file provided")),
    };
    let model = content::load(&input)?;
    let selection = resolve_selection(&config.args, Some(&model));

    if let ContentModel::Tabular(data) = &model {
        if selection.is_empty() {
            return Err(ConvertError::usage(format!(
                "select at least one column to convert; available columns: {}",
                data.columns().join(", ")
            )));
        }
    }

    let output_path = resolve_output_path(config, &input);
    if !config.is_quiet() {
        println!("Converting {} ({})", input.display(), config.settings.describe());
    }

    let total = model.total_units(&selection) as u64;
    let pb = if config.is_quiet() {
        indicatif::ProgressBar::hidden()
    } else {
        CliUtils::create_progress_bar(total)
    };

    let (tx, rx) = mpsc::channel();
    let handle = spawn_run(model, config.settings, selection, tx);

    let mut terminal_event = None;
    for event in rx {
        match event {
            RunEvent::Progress(state) => {
                pb.set_position(state.completed_units as u64);
                pb.set_message(state.current_label.clone());
            }
            event @ RunEvent::Finished { .. } | event @ RunEvent::Failed(_) => {
                terminal_event = Some(event);
                break;
            }
        }
    }
    let _ = handle.join();

    match terminal_event {
        Some(RunEvent::Finished { model, stats }) => {
            pb.finish_and_clear();
            content::save(&model, &output_path)?;
            CliUtils::show_success(
                &format!("Converted to: {}", output_path.display()),
                config.is_quiet(),
            );
            if config.want_stats() {
                println!("\n{}", stats.render_text());
            }
            Ok(())
        }
        Some(RunEvent::Failed(e)) => {
            pb.abandon();
            Err(e)
        }
        // The worker always sends a terminal event before dropping the
        // sender; a closed channel without one means it panicked.
        _ => Err(ConvertError::Other(anyhow::anyhow!(
            "conversion worker stopped without a result"
        ))),
    }
}

/// Column selection from the flags: `--all-columns` expands to every column
/// of a loaded spreadsheet, `--columns` is taken in the order given.
fn resolve_selection(args: &Args, model: Option<&ContentModel>) -> ColumnSelection {
    if args.all_columns {
        if let Some(ContentModel::Tabular(data)) = model {
            return ColumnSelection::all_of(data);
        }
    }
    args.columns.iter().cloned().collect()
}

fn resolve_output_path(config: &CliConfig, input: &PathBuf) -> PathBuf {
    match &config.args.output {
        Some(path) => path.clone(),
        None => content::derived_output_path(input, &config.settings),
    }
}
