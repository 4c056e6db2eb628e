//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module:
//! - parses CLI arguments and sets up logging
//! - resolves arguments into `SmoothConfig` / `FigureConfig`
//! - runs the matching pipeline
//! - handles `--show` (terminal viewer or ASCII preview)

use std::io::IsTerminal;

use clap::Parser;
use log::info;

use crate::cli::{Command, ParamSpaceArgs, SmoothArgs};
use crate::domain::{Dpi, FigureConfig, SmoothConfig};
use crate::error::AppError;

pub mod pipeline;

const PREVIEW_WIDTH: usize = 72;
const PREVIEW_HEIGHT: usize = 24;

/// Entry point for the `crsd` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init();

    match cli.command {
        Command::Smooth(args) => handle_smooth(&args),
        Command::ParamSpace(args) => handle_param_space(&args),
    }
}

fn handle_smooth(args: &SmoothArgs) -> Result<(), AppError> {
    let config = smooth_config_from_args(args);
    pipeline::run_smooth(&config)?;
    Ok(())
}

fn handle_param_space(args: &ParamSpaceArgs) -> Result<(), AppError> {
    let config = figure_config_from_args(args);
    let run = pipeline::run_param_space(&config)?;

    if config.show {
        if std::io::stdout().is_terminal() {
            crate::tui::run(&run.figure)?;
        } else {
            info!("stdout is not a terminal; printing ASCII preview");
            println!(
                "{}",
                crate::plot::render_ascii_drag(&run.figure, PREVIEW_WIDTH, PREVIEW_HEIGHT)
            );
        }
    }
    Ok(())
}

pub fn smooth_config_from_args(args: &SmoothArgs) -> SmoothConfig {
    SmoothConfig {
        input: args.input.clone(),
        output: args.output.clone(),
        window_length: args.window,
        std: args.stdev as f64,
        min_support: args.min_support,
        epoch_column: args.epoch_column.clone(),
        shift_seconds: args.shift_seconds,
    }
}

pub fn figure_config_from_args(args: &ParamSpaceArgs) -> FigureConfig {
    FigureConfig {
        input_dir: args.input_path.clone(),
        output_dir: args.output_path.clone(),
        format: args.format,
        dpi: Dpi::parse_lenient(&args.dpi),
        show: args.show,
        render_only: args.render_only,
        export_contours: args.export_contours.clone(),
    }
}
