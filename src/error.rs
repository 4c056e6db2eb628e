//! Error types.
//!
//! `AppError` is what the binary reports: a message plus the process exit code.
//! Library code returns the typed errors below and converts at the edge:
//!
//! - 2: input/IO problems (unreadable files, bad CSV, missing column, bad window)
//! - 3: no usable data (grid shape or axis mismatch, empty grids)
//! - 4: compute, render or terminal failures

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures of the timeseries smoother.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SmoothError {
    #[error("missing required column: `{column}`")]
    MissingColumn { column: String },
    #[error("invalid smoothing window: length={length}, std={std} (length must be 1..={max}, std > 0)", max = crate::domain::MAX_WINDOW_LENGTH)]
    InvalidWindow { length: i64, std: f64 },
    #[error("invalid epoch timestamp on data row {row}")]
    InvalidTimestamp { row: usize },
}

/// Failures while assembling the co-indexed parameter grids.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GridError {
    #[error("grid `{name}` has no values")]
    EmptyGrid { name: String },
    #[error("grid `{name}` has shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        name: String,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("grid `{name}` is not indexed like `{reference}` (row or column labels differ)")]
    AxisMismatch { name: String, reference: String },
}

/// Failures while drawing the figure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("output format `{0}` is not supported by the rendering backend (use png or svg)")]
    Unsupported(String),
    #[error("dpi {0} exceeds the maximum of {max}", max = crate::domain::MAX_DPI)]
    Resolution(u32),
    #[error("failed to render figure: {0}")]
    Backend(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(value: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Backend(format!("{value:?}"))
    }
}

impl From<SmoothError> for AppError {
    fn from(value: SmoothError) -> Self {
        AppError::new(2, value.to_string())
    }
}

impl From<GridError> for AppError {
    fn from(value: GridError) -> Self {
        AppError::new(3, value.to_string())
    }
}

impl From<RenderError> for AppError {
    fn from(value: RenderError) -> Self {
        let code = match value {
            RenderError::Unsupported(_) | RenderError::Resolution(_) => 2,
            RenderError::Backend(_) => 4,
        };
        AppError::new(code, value.to_string())
    }
}
