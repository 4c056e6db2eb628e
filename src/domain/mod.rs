//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - tables and timeseries (`RawTable`, `Timeseries`, `SmoothingWindow`)
//! - model grids and contour geometry (`ParameterGrid`, `ContourSet`, `ContourLabel`)
//! - resolved run configuration (`SmoothConfig`, `FigureConfig`)

pub mod types;

pub use types::*;
