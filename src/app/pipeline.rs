//! Shared workflows behind the two subcommands.
//!
//! - smoothing: CSV -> timeseries -> Gaussian rolling mean -> optional shift -> CSV
//! - parameter space: grid CSVs -> drag + contours + labels -> rendered figure
//!
//! Front-ends (`app`, the TUI viewer) only deal with presentation.

use std::path::PathBuf;

use log::{info, warn};

use crate::domain::{FigureConfig, OutputFormat, SmoothConfig, Timeseries};
use crate::error::{AppError, RenderError};
use crate::figure::{render_figure, FigureStyle, ParamSpaceFigure};
use crate::grid::GridSet;

/// Outputs of one `crsd smooth` run.
#[derive(Debug, Clone)]
pub struct SmoothRun {
    pub smoothed: Timeseries,
    pub rows_in: usize,
    pub rows_out: usize,
}

/// Load, smooth and write a timeseries CSV.
pub fn run_smooth(config: &SmoothConfig) -> Result<SmoothRun, AppError> {
    info!("loading data from: {}", config.input.display());
    info!("writing data to: {}", config.output.display());
    info!("using a window length of {} samples", config.window_length);

    let window = config.window()?;
    if !window.tapers() {
        warn!(
            "kernel std ({}) is not smaller than the window length ({}); the kernel barely tapers",
            window.std(),
            window.length()
        );
    }
    if !config.shift_seconds.is_finite() {
        return Err(AppError::new(2, format!("invalid time shift: {}", config.shift_seconds)));
    }

    let table = crate::io::read_table_csv(&config.input)?;
    let series = Timeseries::from_table(&table, &config.epoch_column)?;
    info!("data loaded");
    if series.is_empty() {
        warn!("input has no data rows; writing header only");
    }
    if !series.is_strictly_increasing() {
        warn!("epoch column `{}` is not strictly increasing", config.epoch_column);
    }

    info!("running smoothing");
    let mut smoothed = crate::smooth::smooth(&series, &window);
    if config.shift_seconds != 0.0 {
        smoothed = crate::smooth::shift_index(&smoothed, config.shift_seconds);
        info!(
            "shifted index by {} s, {} of {} rows kept",
            config.shift_seconds,
            smoothed.len(),
            series.len()
        );
    }

    info!("writing data to disk");
    let out = smoothed.clone().into_table(&config.epoch_column);
    crate::io::write_table_csv(&config.output, &out)?;
    info!("data written to disk - concluding main");

    Ok(SmoothRun {
        rows_in: series.len(),
        rows_out: smoothed.len(),
        smoothed,
    })
}

/// Outputs of one `crsd param-space` run.
#[derive(Debug, Clone)]
pub struct FigureRun {
    pub figure: ParamSpaceFigure,
    /// Path of the saved image; `None` with `--render-only`.
    pub written: Option<PathBuf>,
}

/// Load the model grids, build the figure and render it.
pub fn run_param_space(config: &FigureConfig) -> Result<FigureRun, AppError> {
    // Fail before any work if the backend cannot write the requested format.
    if config.format == OutputFormat::Pdf && !config.render_only {
        return Err(RenderError::Unsupported("pdf".to_string()).into());
    }
    if !config.dpi.within_limit() {
        return Err(RenderError::Resolution(config.dpi.value()).into());
    }

    info!("loading model grids from {}", config.input_dir.display());
    let grids = crate::io::load_grid_set(&config.input_dir)?;
    let (rows, cols) = grids.shape();
    info!("grids loaded: {rows}x{cols}");

    let figure = build_figure(&grids);
    if let Some(path) = &config.export_contours {
        crate::io::write_contours_json(path, &figure)?;
        info!("contours written to {}", path.display());
    }

    let written = render_figure(&figure, config)?;
    Ok(FigureRun { figure, written })
}

pub fn build_figure(grids: &GridSet) -> ParamSpaceFigure {
    let figure = ParamSpaceFigure::build(grids, FigureStyle::default());
    if figure.drag.iter().all(|mu| !mu.is_finite()) {
        warn!("drag is undefined everywhere; the heatmap will be empty");
    }
    figure
}
