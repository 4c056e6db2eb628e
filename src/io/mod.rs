//! Input/output helpers.
//!
//! - numeric CSV tables for the smoother (`table`)
//! - labelled model grids for the figure (`grid`)
//! - contour JSON export (`contours`)

pub mod contours;
pub mod grid;
pub mod table;

pub use contours::*;
pub use grid::*;
pub use table::*;
