//! Shared domain types.
//!
//! These are plain data holders used by the smoother, the grid plotter and the
//! IO layer. Anything that needs to be written out (contours, labels) derives
//! `Serialize` so it can be exported as JSON.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::error::SmoothError;

/// Name of the epoch column written by the CRSD logger.
pub const DEFAULT_EPOCH_COLUMN: &str = "Epoch_UTC";

/// Minimum number of valid samples a window must contain to produce a value.
pub const DEFAULT_MIN_SUPPORT: usize = 3;

/// Longest accepted smoothing window (samples).
pub const MAX_WINDOW_LENGTH: usize = 1 << 24;

/// Highest accepted output resolution.
pub const MAX_DPI: u32 = 1200;

/// Figure size in inches (width, height).
pub const FIGURE_SIZE_INCHES: (f64, f64) = (6.0, 4.5);

/// Resolution used when the DPI is left at `figure`.
pub const FIGURE_DPI: u32 = 100;

/// An untyped numeric table as read from CSV.
///
/// Columns are stored column-major; every column has the same length.
/// Missing cells are `NaN`.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<f64>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, columns: Vec<Vec<f64>>) -> Self {
        Self { headers, columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn n_columns(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.column_index(name).map(|idx| self.columns[idx].as_slice())
    }
}

/// One numeric channel of a timeseries.
#[derive(Debug, Clone)]
pub struct Channel {
    pub name: String,
    pub values: Vec<f64>,
}

/// A time-indexed set of channels.
///
/// `index` is assumed strictly increasing; this is checked (and logged) but
/// never enforced.
#[derive(Debug, Clone, Default)]
pub struct Timeseries {
    pub index: Vec<DateTime<Utc>>,
    pub channels: Vec<Channel>,
}

impl Timeseries {
    /// Split `epoch_column` off a raw table and turn it into the time index.
    pub fn from_table(table: &RawTable, epoch_column: &str) -> Result<Self, SmoothError> {
        let epoch_idx = table
            .column_index(epoch_column)
            .ok_or_else(|| SmoothError::MissingColumn {
                column: epoch_column.to_string(),
            })?;

        let index = table.columns[epoch_idx]
            .iter()
            .enumerate()
            .map(|(row, &secs)| epoch_to_datetime(secs).ok_or(SmoothError::InvalidTimestamp { row: row + 1 }))
            .collect::<Result<Vec<_>, _>>()?;

        let channels = table
            .headers
            .iter()
            .zip(table.columns.iter())
            .enumerate()
            .filter(|(idx, _)| *idx != epoch_idx)
            .map(|(_, (name, values))| Channel {
                name: name.clone(),
                values: values.clone(),
            })
            .collect();

        Ok(Self { index, channels })
    }

    /// Flatten back into a table: channels in order, then the regenerated epoch column.
    pub fn into_table(self, epoch_column: &str) -> RawTable {
        let epochs: Vec<f64> = self.index.iter().map(datetime_to_epoch).collect();

        let mut headers = Vec::with_capacity(self.channels.len() + 1);
        let mut columns = Vec::with_capacity(self.channels.len() + 1);
        for ch in self.channels {
            headers.push(ch.name);
            columns.push(ch.values);
        }
        headers.push(epoch_column.to_string());
        columns.push(epochs);

        RawTable::new(headers, columns)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn is_strictly_increasing(&self) -> bool {
        self.index.windows(2).all(|w| w[0] < w[1])
    }
}

/// Convert float seconds since the Unix epoch to a UTC timestamp (nanosecond resolution).
pub fn epoch_to_datetime(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let mut whole = secs.floor();
    let mut nanos = ((secs - whole) * 1e9).round();
    if nanos >= 1e9 {
        whole += 1.0;
        nanos = 0.0;
    }
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp(whole as i64, nanos as u32)
}

/// Inverse of [`epoch_to_datetime`].
pub fn datetime_to_epoch(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) / 1e9
}

/// A symmetric Gaussian smoothing window measured in samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingWindow {
    length: usize,
    std: f64,
    min_support: usize,
}

impl SmoothingWindow {
    /// Validate a window length and kernel standard deviation (both in samples).
    pub fn new(length: i64, std: f64) -> Result<Self, SmoothError> {
        let valid_std = std.is_finite() && std > 0.0;
        match usize::try_from(length) {
            Ok(len) if (1..=MAX_WINDOW_LENGTH).contains(&len) && valid_std => Ok(Self {
                length: len,
                std,
                min_support: DEFAULT_MIN_SUPPORT,
            }),
            _ => Err(SmoothError::InvalidWindow { length, std }),
        }
    }

    pub fn with_min_support(mut self, min_support: usize) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn std(&self) -> f64 {
        self.std
    }

    pub fn min_support(&self) -> usize {
        self.min_support
    }

    /// Whether σ is small enough relative to W for the kernel to taper.
    pub fn tapers(&self) -> bool {
        self.std < self.length as f64
    }
}

/// Resolved settings for `crsd smooth`.
#[derive(Debug, Clone)]
pub struct SmoothConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub window_length: i64,
    pub std: f64,
    pub min_support: usize,
    pub epoch_column: String,
    /// Shift applied to the time index after smoothing (seconds).
    pub shift_seconds: f64,
}

impl SmoothConfig {
    pub fn window(&self) -> Result<SmoothingWindow, SmoothError> {
        Ok(SmoothingWindow::new(self.window_length, self.std)?.with_min_support(self.min_support))
    }
}

/// The four physical quantities of the steady-state model grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridKind {
    Pressure,
    Velocity,
    Contact,
    Shear,
}

impl GridKind {
    pub const ALL: [GridKind; 4] = [GridKind::Pressure, GridKind::Velocity, GridKind::Contact, GridKind::Shear];

    /// File name produced by the parameter-space generator.
    pub fn file_name(self) -> &'static str {
        match self {
            GridKind::Pressure => "SigmaN_kPa_grid.csv",
            GridKind::Velocity => "Slip_mpy_grid.csv",
            GridKind::Contact => "S_total_grid.csv",
            GridKind::Shear => "Tau_kPa_grid.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GridKind::Pressure => "effective pressure",
            GridKind::Velocity => "slip velocity",
            GridKind::Contact => "contact fraction",
            GridKind::Shear => "shear stress",
        }
    }
}

/// One 2-D model grid with the labels of its CSV axes.
#[derive(Debug, Clone)]
pub struct ParameterGrid {
    pub name: String,
    pub index_name: String,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub values: DMatrix<f64>,
}

impl ParameterGrid {
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }
}

/// A polyline where a field crosses one level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourPath {
    pub closed: bool,
    pub vertices: Vec<(f64, f64)>,
}

/// All paths of a single contour level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourSet {
    pub level: f64,
    pub paths: Vec<ContourPath>,
}

/// A contour label anchored on a path vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContourLabel {
    pub level: f64,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Image format for the rendered figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Pdf,
    Svg,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Svg => "svg",
        }
    }
}

/// Output resolution: the figure's native DPI or an explicit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dpi {
    Figure,
    Dots(u32),
}

impl Dpi {
    /// Parse `figure` or a positive integer; anything else falls back to `figure`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().parse::<u32>() {
            Ok(n) if n > 0 => Dpi::Dots(n),
            _ => Dpi::Figure,
        }
    }

    pub fn value(self) -> u32 {
        match self {
            Dpi::Figure => FIGURE_DPI,
            Dpi::Dots(n) => n,
        }
    }

    pub fn within_limit(self) -> bool {
        self.value() <= MAX_DPI
    }

    /// Tag used in output file names (`fdpi` or `<n>dpi`).
    pub fn file_tag(self) -> String {
        match self {
            Dpi::Figure => "fdpi".to_string(),
            Dpi::Dots(n) => format!("{n}dpi"),
        }
    }

    /// Pixel dimensions of the figure at this resolution.
    pub fn pixel_size(self) -> (u32, u32) {
        let dpi = f64::from(self.value());
        (
            (FIGURE_SIZE_INCHES.0 * dpi).round() as u32,
            (FIGURE_SIZE_INCHES.1 * dpi).round() as u32,
        )
    }
}

/// Resolved settings for `crsd param-space`.
#[derive(Debug, Clone)]
pub struct FigureConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub dpi: Dpi,
    pub show: bool,
    pub render_only: bool,
    pub export_contours: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            vec!["a".to_string(), "Epoch_UTC".to_string(), "b".to_string()],
            vec![vec![1.0, 2.0], vec![1_700_000_000.0, 1_700_000_001.5], vec![3.0, 4.0]],
        )
    }

    #[test]
    fn from_table_splits_epoch_column() {
        let ts = Timeseries::from_table(&table(), DEFAULT_EPOCH_COLUMN).unwrap();
        assert_eq!(ts.len(), 2);
        let names: Vec<&str> = ts.channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(ts.is_strictly_increasing());
    }

    #[test]
    fn from_table_reports_missing_epoch() {
        let err = Timeseries::from_table(&table(), "epoch").unwrap_err();
        assert_eq!(
            err,
            SmoothError::MissingColumn {
                column: "epoch".to_string()
            }
        );
    }

    #[test]
    fn from_table_rejects_nan_epoch() {
        let mut t = table();
        t.columns[1][1] = f64::NAN;
        let err = Timeseries::from_table(&t, DEFAULT_EPOCH_COLUMN).unwrap_err();
        assert_eq!(err, SmoothError::InvalidTimestamp { row: 2 });
    }

    #[test]
    fn into_table_appends_epoch_last() {
        let ts = Timeseries::from_table(&table(), DEFAULT_EPOCH_COLUMN).unwrap();
        let out = ts.into_table(DEFAULT_EPOCH_COLUMN);
        assert_eq!(out.headers, vec!["a", "b", "Epoch_UTC"]);
        let epoch = out.column("Epoch_UTC").unwrap();
        assert!((epoch[0] - 1_700_000_000.0).abs() < 1e-6);
        assert!((epoch[1] - 1_700_000_001.5).abs() < 1e-6);
    }

    #[test]
    fn epoch_round_trip_keeps_subsecond_precision() {
        let secs = 1_690_000_123.25;
        let dt = epoch_to_datetime(secs).unwrap();
        assert_eq!(dt.timestamp(), 1_690_000_123);
        assert_eq!(dt.timestamp_subsec_nanos(), 250_000_000);
        assert!((datetime_to_epoch(&dt) - secs).abs() < 1e-6);
        assert!(epoch_to_datetime(f64::INFINITY).is_none());
    }

    #[test]
    fn window_validation() {
        assert!(SmoothingWindow::new(600, 75.0).is_ok());
        assert!(matches!(
            SmoothingWindow::new(0, 75.0),
            Err(SmoothError::InvalidWindow { length: 0, .. })
        ));
        assert!(SmoothingWindow::new(-5, 75.0).is_err());
        assert!(SmoothingWindow::new(600, 0.0).is_err());
        assert!(SmoothingWindow::new(600, -1.0).is_err());
        assert!(SmoothingWindow::new(600, f64::NAN).is_err());
        assert!(SmoothingWindow::new(MAX_WINDOW_LENGTH as i64, 75.0).is_ok());
        assert!(matches!(
            SmoothingWindow::new(i64::MAX, 75.0),
            Err(SmoothError::InvalidWindow { length: i64::MAX, .. })
        ));

        let w = SmoothingWindow::new(10, 20.0).unwrap();
        assert_eq!(w.min_support(), DEFAULT_MIN_SUPPORT);
        assert!(!w.tapers());
    }

    #[test]
    fn dpi_parsing_and_naming() {
        assert_eq!(Dpi::parse_lenient("figure"), Dpi::Figure);
        assert_eq!(Dpi::parse_lenient(" 300 "), Dpi::Dots(300));
        assert_eq!(Dpi::parse_lenient("high"), Dpi::Figure);
        assert_eq!(Dpi::parse_lenient("0"), Dpi::Figure);
        assert_eq!(Dpi::Figure.file_tag(), "fdpi");
        assert_eq!(Dpi::Dots(200).file_tag(), "200dpi");
        assert_eq!(Dpi::Figure.pixel_size(), (600, 450));
        assert_eq!(Dpi::Dots(200).pixel_size(), (1200, 900));
        assert!(Dpi::Figure.within_limit());
        assert!(Dpi::Dots(MAX_DPI).within_limit());
        assert!(!Dpi::parse_lenient("4000000000").within_limit());
    }
}
