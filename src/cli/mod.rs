//! Command-line parsing for the cavitation ring-shear figure tools.
//!
//! Argument parsing and dispatch live here and in `app`; the numeric code in
//! `smooth`, `grid` and `contour` never sees clap types.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{OutputFormat, DEFAULT_EPOCH_COLUMN, DEFAULT_MIN_SUPPORT};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "crsd", version, about = "Ring-shear experiment data smoothing and figure tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gaussian rolling-window smoothing of a timeseries CSV.
    Smooth(SmoothArgs),
    /// Render the steady-state parameter-space figure from model grids.
    ///
    /// Shades drag (τ/N) over slip velocity and effective pressure, with
    /// shear-stress and contact-fraction contours.
    ParamSpace(ParamSpaceArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct SmoothArgs {
    /// Input CSV with an epoch-seconds column.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output CSV path.
    #[arg(short = 'o', long, default_value = "tmp_smoothed_data.csv")]
    pub output: PathBuf,

    /// Standard deviation of the Gaussian kernel (whole samples).
    #[arg(short = 's', long, default_value_t = 75, allow_negative_numbers = true)]
    pub stdev: i64,

    /// Window length (samples).
    #[arg(short = 'w', long, default_value_t = 600, allow_negative_numbers = true)]
    pub window: i64,

    /// Minimum number of non-missing samples in a window.
    #[arg(long, default_value_t = DEFAULT_MIN_SUPPORT)]
    pub min_support: usize,

    /// Name of the epoch-seconds column.
    #[arg(long, default_value = DEFAULT_EPOCH_COLUMN)]
    pub epoch_column: String,

    /// Shift the time index by this many seconds after smoothing.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub shift_seconds: f64,
}

#[derive(Debug, Parser, Clone)]
pub struct ParamSpaceArgs {
    /// Directory holding the model grid CSVs.
    #[arg(short = 'i', long, default_value = "./processed_data/steadystate")]
    pub input_path: PathBuf,

    /// Directory for the rendered figure (created if missing).
    #[arg(short = 'o', long, default_value = "../results/figures")]
    pub output_path: PathBuf,

    /// Output image format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Png)]
    pub format: OutputFormat,

    /// Resolution: `figure` or a positive integer.
    #[arg(short = 'd', long, default_value = "figure")]
    pub dpi: String,

    /// Display the figure (terminal viewer, or ASCII when not a terminal).
    #[arg(short = 's', long)]
    pub show: bool,

    /// Draw the figure without writing it to disk.
    #[arg(short = 'r', long)]
    pub render_only: bool,

    /// Also write contour paths and labels as JSON.
    #[arg(long = "export-contours", value_name = "JSON")]
    pub export_contours: Option<PathBuf>,
}
