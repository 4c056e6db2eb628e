//! Co-indexed steady-state model grids and the derived drag field.

use nalgebra::DMatrix;

use crate::domain::{GridKind, ParameterGrid};
use crate::error::GridError;

/// The four model grids, validated to share shape and axis labels.
#[derive(Debug, Clone)]
pub struct GridSet {
    pub pressure: ParameterGrid,
    pub velocity: ParameterGrid,
    pub contact: ParameterGrid,
    pub shear: ParameterGrid,
}

impl GridSet {
    pub fn new(
        pressure: ParameterGrid,
        velocity: ParameterGrid,
        contact: ParameterGrid,
        shear: ParameterGrid,
    ) -> Result<Self, GridError> {
        let set = Self {
            pressure,
            velocity,
            contact,
            shear,
        };
        set.validate()?;
        Ok(set)
    }

    pub fn get(&self, kind: GridKind) -> &ParameterGrid {
        match kind {
            GridKind::Pressure => &self.pressure,
            GridKind::Velocity => &self.velocity,
            GridKind::Contact => &self.contact,
            GridKind::Shear => &self.shear,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.pressure.shape()
    }

    /// Drag ratio μ = τ / N.
    pub fn drag(&self) -> DMatrix<f64> {
        drag_ratio(&self.shear.values, &self.pressure.values)
    }

    fn validate(&self) -> Result<(), GridError> {
        let reference = &self.pressure;
        for kind in GridKind::ALL {
            let grid = self.get(kind);
            let (rows, cols) = grid.shape();
            if rows == 0 || cols == 0 {
                return Err(GridError::EmptyGrid {
                    name: grid.name.clone(),
                });
            }
            if grid.shape() != reference.shape() {
                return Err(GridError::ShapeMismatch {
                    name: grid.name.clone(),
                    expected: reference.shape(),
                    actual: grid.shape(),
                });
            }
            if grid.row_labels != reference.row_labels || grid.column_labels != reference.column_labels {
                return Err(GridError::AxisMismatch {
                    name: grid.name.clone(),
                    reference: reference.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Elementwise `shear / pressure`; anything non-finite becomes `NaN`.
pub fn drag_ratio(shear: &DMatrix<f64>, pressure: &DMatrix<f64>) -> DMatrix<f64> {
    shear.zip_map(pressure, |tau, n| {
        let mu = tau / n;
        if mu.is_finite() { mu } else { f64::NAN }
    })
}

/// Smallest and largest finite entries, if any.
pub fn finite_range(values: &DMatrix<f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if lo.is_finite() && hi.is_finite() { Some((lo, hi)) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(name: &str, rows: usize, cols: usize, data: &[f64]) -> ParameterGrid {
        ParameterGrid {
            name: name.to_string(),
            index_name: String::new(),
            row_labels: (0..rows).map(|r| r.to_string()).collect(),
            column_labels: (0..cols).map(|c| format!("c{c}")).collect(),
            values: DMatrix::from_row_slice(rows, cols, data),
        }
    }

    #[test]
    fn drag_maps_division_by_zero_to_nan() {
        let shear = DMatrix::from_row_slice(1, 4, &[10.0, 5.0, 0.0, f64::NAN]);
        let pressure = DMatrix::from_row_slice(1, 4, &[100.0, 0.0, 0.0, 1.0]);
        let mu = drag_ratio(&shear, &pressure);
        assert!((mu[(0, 0)] - 0.1).abs() < 1e-15);
        assert!(mu[(0, 1)].is_nan());
        assert!(mu[(0, 2)].is_nan());
        assert!(mu[(0, 3)].is_nan());
    }

    #[test]
    fn grid_set_checks_shapes_and_labels() {
        let ok = GridSet::new(
            grid("N", 2, 2, &[1.0, 2.0, 3.0, 4.0]),
            grid("V", 2, 2, &[1.0; 4]),
            grid("S", 2, 2, &[1.0; 4]),
            grid("tau", 2, 2, &[2.0, 2.0, 3.0, 8.0]),
        )
        .unwrap();
        assert_eq!(ok.shape(), (2, 2));
        assert!((ok.drag()[(1, 1)] - 2.0).abs() < 1e-15);

        let err = GridSet::new(
            grid("N", 2, 2, &[1.0; 4]),
            grid("V", 2, 3, &[1.0; 6]),
            grid("S", 2, 2, &[1.0; 4]),
            grid("tau", 2, 2, &[1.0; 4]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            GridError::ShapeMismatch {
                name: "V".to_string(),
                expected: (2, 2),
                actual: (2, 3),
            }
        );

        let mut shifted = grid("S", 2, 2, &[1.0; 4]);
        shifted.row_labels[1] = "99".to_string();
        let err = GridSet::new(
            grid("N", 2, 2, &[1.0; 4]),
            grid("V", 2, 2, &[1.0; 4]),
            shifted,
            grid("tau", 2, 2, &[1.0; 4]),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::AxisMismatch { .. }));
    }

    #[test]
    fn empty_grid_is_rejected() {
        let err = GridSet::new(
            grid("N", 0, 2, &[]),
            grid("V", 0, 2, &[]),
            grid("S", 0, 2, &[]),
            grid("tau", 0, 2, &[]),
        )
        .unwrap_err();
        assert!(matches!(err, GridError::EmptyGrid { .. }));
    }

    #[test]
    fn finite_range_skips_nan() {
        let m = DMatrix::from_row_slice(2, 2, &[f64::NAN, 3.0, -1.0, f64::INFINITY]);
        assert_eq!(finite_range(&m), Some((-1.0, 3.0)));
        assert_eq!(finite_range(&DMatrix::from_element(1, 1, f64::NAN)), None);
    }
}
