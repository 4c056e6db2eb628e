//! Contour geometry for the parameter-space figure.
//!
//! - marching-squares extraction on curvilinear grids (`marching`)
//! - fixed-column label placement (`labels`)

pub mod labels;
pub mod marching;

pub use labels::*;
pub use marching::*;

use nalgebra::DMatrix;

use crate::domain::ContourSet;

/// Contour `z` at each of `levels`, in order.
pub fn contour_levels(x: &DMatrix<f64>, y: &DMatrix<f64>, z: &DMatrix<f64>, levels: &[f64]) -> Vec<ContourSet> {
    levels.iter().map(|&level| contour_lines(x, y, z, level)).collect()
}
