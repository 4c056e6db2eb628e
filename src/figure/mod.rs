//! The steady-state parameter-space figure (drag, shear stress and contact
//! fraction over slip velocity × effective pressure).
//!
//! `ParamSpaceFigure::build` does all of the numeric work (drag, contours,
//! label positions, axis bounds). The `render` module only draws it.

use log::{debug, warn};
use nalgebra::DMatrix;

use crate::contour::{contour_levels, place_labels, LabelFormat};
use crate::domain::{ContourLabel, ContourSet};
use crate::grid::{finite_range, GridSet};

pub mod colormap;
pub mod render;

pub use render::*;

/// Fixed content of the paper figure, in data units (m/a, kPa).
#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub shear_levels: Vec<f64>,
    /// Operational shear-stress limit of the ring-shear device.
    pub shear_limit: f64,
    pub contact_levels: Vec<f64>,
    pub shear_label_x: f64,
    pub contact_label_x: f64,
    pub drag_limits: (f64, f64),
    pub x_range: (f64, f64),
    /// Centerline velocity and the N(t) range covered by the experiments.
    pub operating_velocity: f64,
    pub operating_pressure: (f64, f64),
    pub operating_marker: f64,
    /// Shaded `V < V_min` zone: (x0, x1, y0, y1).
    pub min_velocity_zone: (f64, f64, f64, f64),
    pub no_cavity_anchor: (f64, f64),
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            shear_levels: (1..=10).map(|k| 25.0 * k as f64).collect(),
            shear_limit: 275.0,
            contact_levels: (1..=9).map(|k| k as f64 / 10.0).collect(),
            shear_label_x: 23.0,
            contact_label_x: 9.0,
            drag_limits: (0.0, 0.35),
            x_range: (0.0, 30.0),
            operating_velocity: 15.0,
            operating_pressure: (210.0, 490.0),
            operating_marker: 350.0,
            min_velocity_zone: (0.0, 4.0, 100.0, 900.0),
            no_cavity_anchor: (0.25, 800.0),
        }
    }
}

/// Everything needed to draw the figure.
#[derive(Debug, Clone)]
pub struct ParamSpaceFigure {
    pub velocity: DMatrix<f64>,
    pub pressure: DMatrix<f64>,
    pub drag: DMatrix<f64>,
    pub shear_contours: Vec<ContourSet>,
    pub limit_contours: Vec<ContourSet>,
    pub contact_contours: Vec<ContourSet>,
    pub shear_labels: Vec<ContourLabel>,
    pub limit_labels: Vec<ContourLabel>,
    pub contact_labels: Vec<ContourLabel>,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub style: FigureStyle,
}

impl ParamSpaceFigure {
    pub fn build(grids: &GridSet, style: FigureStyle) -> Self {
        let velocity = grids.velocity.values.clone();
        let pressure = grids.pressure.values.clone();
        let drag = grids.drag();

        let shear_contours = contour_levels(&velocity, &pressure, &grids.shear.values, &style.shear_levels);
        let limit_contours = contour_levels(&velocity, &pressure, &grids.shear.values, &[style.shear_limit]);
        let contact_contours = contour_levels(&velocity, &pressure, &grids.contact.values, &style.contact_levels);

        for set in shear_contours.iter().chain(&limit_contours).chain(&contact_contours) {
            if set.paths.is_empty() {
                warn!("no contour path at level {}", set.level);
            } else {
                debug!("level {}: {} path(s)", set.level, set.paths.len());
            }
        }

        let shear_labels = place_labels(&shear_contours, style.shear_label_x, LabelFormat::Kilopascal);
        let limit_labels = place_labels(&limit_contours, style.shear_label_x, LabelFormat::Kilopascal);
        let contact_labels = place_labels(&contact_contours, style.contact_label_x, LabelFormat::OneDecimal);

        let y_range = finite_range(&pressure)
            .filter(|(lo, hi)| hi > lo)
            .unwrap_or((0.0, 1.0));

        Self {
            velocity,
            pressure,
            drag,
            shear_contours,
            limit_contours,
            contact_contours,
            shear_labels,
            limit_labels,
            contact_labels,
            x_range: style.x_range,
            y_range,
            style,
        }
    }

    /// Iterate the drawable heatmap cells as (corner quad, drag value).
    ///
    /// Cell `(i, j)` spans nodes `(i, j)..=(i + 1, j + 1)` and takes the value
    /// at `(i, j)`; cells with a missing value or corner are skipped.
    pub fn drag_cells(&self) -> Vec<([(f64, f64); 4], f64)> {
        let (nr, nc) = self.drag.shape();
        let mut out = Vec::new();
        for i in 0..nr.saturating_sub(1) {
            for j in 0..nc.saturating_sub(1) {
                let mu = self.drag[(i, j)];
                if !mu.is_finite() {
                    continue;
                }
                let quad = [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)]
                    .map(|rc| (self.velocity[rc], self.pressure[rc]));
                if quad.iter().all(|(x, y)| x.is_finite() && y.is_finite()) {
                    out.push((quad, mu));
                }
            }
        }
        out
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::synthetic_grids;
    use super::*;

    #[test]
    fn default_levels_match_the_paper() {
        let style = FigureStyle::default();
        assert_eq!(style.shear_levels.first(), Some(&25.0));
        assert_eq!(style.shear_levels.last(), Some(&250.0));
        assert_eq!(style.shear_levels.len(), 10);
        assert_eq!(style.contact_levels.len(), 9);
        assert!((style.contact_levels[2] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn build_extracts_contours_and_labels() {
        let fig = ParamSpaceFigure::build(&synthetic_grids(), FigureStyle::default());

        assert_eq!(fig.shear_contours.len(), 10);
        assert_eq!(fig.contact_contours.len(), 9);
        assert!(fig.shear_contours.iter().all(|s| !s.paths.is_empty()));
        assert_eq!(fig.y_range, (100.0, 900.0));
        assert_eq!(fig.x_range, (0.0, 30.0));

        // S = V/30 gives vertical contours; the 0.3 label lands at V = 9.
        let s03 = fig.contact_labels.iter().find(|l| l.text == "0.3").unwrap();
        assert!((s03.x - 9.0).abs() < 1e-9);

        // τ = 50 kPa crosses V = 23 m/a at N = 50·30 / (0.4·23).
        let tau50 = fig.shear_labels.iter().find(|l| l.text == "50 kPa").unwrap();
        let expected_n = 50.0 * 30.0 / (0.4 * 23.0);
        assert!((tau50.x - 23.0).abs() < 1e-9);
        assert!((tau50.y - expected_n).abs() < 1e-6);

        // τ reaches 275 kPa only in the high-V, high-N corner.
        assert_eq!(fig.limit_labels.len(), 1);
        assert_eq!(fig.limit_labels[0].text, "275 kPa");
        assert!(fig.limit_labels[0].y > 680.0);
    }

    #[test]
    fn drag_cells_skip_missing_values() {
        let mut grids = synthetic_grids();
        // τ = 0 at V = 0, so N = 0 there makes μ = 0/0.
        grids.pressure.values[(0, 0)] = 0.0;
        let fig = ParamSpaceFigure::build(&grids, FigureStyle::default());
        let (nr, nc) = fig.drag.shape();
        let cells = fig.drag_cells();
        assert_eq!(cells.len(), (nr - 1) * (nc - 1) - 1);
        assert!(cells.iter().all(|(_, mu)| mu.is_finite()));
    }
}
