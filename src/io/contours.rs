//! Contour JSON export.
//!
//! Writes the extracted contour polylines and label anchors of the
//! parameter-space figure so they can be re-plotted or checked elsewhere.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ContourLabel, ContourSet};
use crate::error::AppError;
use crate::figure::ParamSpaceFigure;

/// On-disk schema of `--export-contours`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContourFile {
    pub tool: String,
    pub figure: String,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub shear: Vec<ContourSet>,
    pub shear_limit: Vec<ContourSet>,
    pub contact: Vec<ContourSet>,
    pub labels: Vec<ContourLabel>,
}

impl ContourFile {
    pub fn from_figure(figure: &ParamSpaceFigure) -> Self {
        let labels = figure
            .shear_labels
            .iter()
            .chain(&figure.limit_labels)
            .chain(&figure.contact_labels)
            .cloned()
            .collect();
        Self {
            tool: "crsd".to_string(),
            figure: "JGLAC_Fig02".to_string(),
            x_range: figure.x_range,
            y_range: figure.y_range,
            shear: figure.shear_contours.clone(),
            shear_limit: figure.limit_contours.clone(),
            contact: figure.contact_contours.clone(),
            labels,
        }
    }
}

pub fn write_contours_json(path: &Path, figure: &ParamSpaceFigure) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create contour JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &ContourFile::from_figure(figure))
        .map_err(|e| AppError::new(2, format!("Failed to write contour JSON: {e}")))?;
    Ok(())
}
