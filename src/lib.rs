//! `crsd-figures` library crate.
//!
//! Data tools for cavitation ring-shear experiments: Gaussian smoothing of
//! logged timeseries and the steady-state parameter-space figure.
//!
//! The binary (`crsd`) is a thin wrapper around this library so the numeric
//! code can be tested without spawning processes.

pub mod app;
pub mod cli;
pub mod contour;
pub mod domain;
pub mod error;
pub mod figure;
pub mod grid;
pub mod io;
pub mod logging;
pub mod plot;
pub mod smooth;
pub mod tui;
