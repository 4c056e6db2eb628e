//! Steady-state model grids stored as labelled CSV matrices.
//!
//! Layout: the header row holds the index name followed by the column labels;
//! every data row holds its row label followed by one value per column.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;
use nalgebra::DMatrix;

use crate::domain::{GridKind, ParameterGrid};
use crate::error::AppError;
use crate::grid::GridSet;
use crate::io::table::{normalize_header_name, parse_cell};

/// Read one grid file; `name` is used in error messages.
pub fn read_grid_csv(path: &Path, name: &str) -> Result<ParameterGrid, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open grid CSV '{}': {e}", path.display())))?;
    parse_grid(file, name).map_err(|e| AppError::new(e.exit_code(), format!("{}: {}", path.display(), e.message())))
}

pub fn parse_grid<R: Read>(reader: R, name: &str) -> Result<ParameterGrid, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read grid headers: {e}")))?
        .clone();
    let index_name = header.get(0).map(normalize_header_name).unwrap_or_default();
    let column_labels: Vec<String> = header.iter().skip(1).map(normalize_header_name).collect();
    let n_cols = column_labels.len();

    let mut row_labels = Vec::new();
    let mut data = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("CSV parse error on line {line}: {e}")))?;
        if record.len() > n_cols + 1 {
            return Err(AppError::new(
                2,
                format!("line {line} of grid `{name}` has {} fields, expected {}", record.len(), n_cols + 1),
            ));
        }
        row_labels.push(record.get(0).unwrap_or_default().to_string());
        for col in 0..n_cols {
            let value = match record.get(col + 1) {
                Some(cell) => parse_cell(cell).ok_or_else(|| {
                    AppError::new(2, format!("non-numeric value '{cell}' in grid `{name}` on line {line}"))
                })?,
                None => f64::NAN,
            };
            data.push(value);
        }
    }

    let values = DMatrix::from_row_slice(row_labels.len(), n_cols, &data);
    debug!("grid `{name}`: {}x{}", values.nrows(), values.ncols());

    Ok(ParameterGrid {
        name: name.to_string(),
        index_name,
        row_labels,
        column_labels,
        values,
    })
}

/// Load the four model grids from `dir` and check they are co-indexed.
pub fn load_grid_set(dir: &Path) -> Result<GridSet, AppError> {
    let load = |kind: GridKind| {
        let file_name = kind.file_name();
        let name = file_name.trim_end_matches(".csv");
        debug!("loading {} grid from {}", kind.label(), dir.join(file_name).display());
        read_grid_csv(&dir.join(file_name), name)
    };

    let pressure = load(GridKind::Pressure)?;
    let velocity = load(GridKind::Velocity)?;
    let contact = load(GridKind::Contact)?;
    let shear = load(GridKind::Shear)?;

    Ok(GridSet::new(pressure, velocity, contact, shear)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labelled_matrix() {
        let csv = ",0,1,2\n0,1.0,2.0,3.0\n1,4.0,,6.0\n";
        let grid = parse_grid(csv.as_bytes(), "Tau_kPa_grid").unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.index_name, "");
        assert_eq!(grid.row_labels, vec!["0", "1"]);
        assert_eq!(grid.column_labels, vec!["0", "1", "2"]);
        assert_eq!(grid.values[(0, 2)], 3.0);
        assert_eq!(grid.values[(1, 0)], 4.0);
        assert!(grid.values[(1, 1)].is_nan());
    }

    #[test]
    fn short_rows_are_padded_and_long_rows_rejected() {
        let grid = parse_grid("i,a,b\nr0,1\n".as_bytes(), "g").unwrap();
        assert_eq!(grid.values[(0, 0)], 1.0);
        assert!(grid.values[(0, 1)].is_nan());

        let err = parse_grid("i,a\nr0,1,2\n".as_bytes(), "g").unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_directory_is_an_input_error() {
        let err = load_grid_set(Path::new("definitely/not/a/real/dir")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("SigmaN_kPa_grid.csv"));
    }

    #[test]
    fn loads_co_indexed_grid_set_from_disk() {
        let dir = std::env::temp_dir().join(format!("crsd-grid-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for kind in GridKind::ALL {
            std::fs::write(dir.join(kind.file_name()), ",0,1\n0,100,200\n1,300,400\n").unwrap();
        }
        let set = load_grid_set(&dir).unwrap();
        assert_eq!(set.shape(), (2, 2));
        assert!((set.drag()[(1, 1)] - 1.0).abs() < 1e-15);

        std::fs::write(dir.join(GridKind::Shear.file_name()), ",0,1,2\n0,1,2,3\n").unwrap();
        let err = load_grid_set(&dir).unwrap_err();
        assert_eq!(err.exit_code(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
