//! Marching-squares contour extraction on (possibly curvilinear) grids.
//!
//! The field `z` is walked cell by cell in index space. Every cell edge whose
//! endpoints straddle the level gets one crossing point, linearly
//! interpolated along the edge and mapped through the coordinate grids `x`
//! and `y`. Within a cell the crossings are paired into segments; segments
//! meet at shared edges, so joining them into polylines is a walk over the
//! edge-adjacency graph.
//!
//! Numerical notes:
//! - a corner equal to the level counts as "above"
//! - cells with any non-finite corner value or coordinate are skipped
//! - saddle cells are split using the mean of the four corners

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::DMatrix;

use crate::domain::{ContourPath, ContourSet};

/// An edge between two neighbouring grid nodes.
///
/// `H(i, j)` joins `(i, j)` and `(i, j + 1)`; `V(i, j)` joins `(i, j)` and `(i + 1, j)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EdgeKey {
    H(usize, usize),
    V(usize, usize),
}

/// Extract the polylines where `z` crosses `level`.
///
/// `x`, `y` and `z` must share a shape; otherwise (or for grids smaller than
/// 2×2) the result has no paths. Open paths are listed before closed loops.
pub fn contour_lines(x: &DMatrix<f64>, y: &DMatrix<f64>, z: &DMatrix<f64>, level: f64) -> ContourSet {
    let empty = ContourSet {
        level,
        paths: Vec::new(),
    };
    let (nr, nc) = z.shape();
    if nr < 2 || nc < 2 || x.shape() != z.shape() || y.shape() != z.shape() || !level.is_finite() {
        return empty;
    }

    let mut points: BTreeMap<EdgeKey, (f64, f64)> = BTreeMap::new();
    let mut adjacency: BTreeMap<EdgeKey, Vec<EdgeKey>> = BTreeMap::new();

    for i in 0..nr - 1 {
        for j in 0..nc - 1 {
            // Corners counter-clockwise in index space: a, b, c, d.
            let corners = [(i, j), (i, j + 1), (i + 1, j + 1), (i + 1, j)];
            let vals = corners.map(|rc| z[rc]);
            let usable = corners
                .iter()
                .all(|&rc| z[rc].is_finite() && x[rc].is_finite() && y[rc].is_finite());
            if !usable {
                continue;
            }

            // Edge k joins corner k and corner k+1.
            let edges = [EdgeKey::H(i, j), EdgeKey::V(i, j + 1), EdgeKey::H(i + 1, j), EdgeKey::V(i, j)];
            let above = vals.map(|v| v >= level);
            let crossed: Vec<usize> = (0..4).filter(|&k| above[k] != above[(k + 1) % 4]).collect();

            let pairs: Vec<(usize, usize)> = match crossed.len() {
                2 => vec![(crossed[0], crossed[1])],
                4 => {
                    let center = vals.iter().sum::<f64>() / 4.0;
                    if (center >= level) == above[0] {
                        // a and c are joined through the center; b and d are cut off.
                        vec![(0, 1), (2, 3)]
                    } else {
                        vec![(3, 0), (1, 2)]
                    }
                }
                _ => Vec::new(),
            };

            for &k in &crossed {
                let p = corners[k];
                let q = corners[(k + 1) % 4];
                points
                    .entry(edges[k])
                    .or_insert_with(|| interpolate(x, y, z, p, q, level));
            }
            for (a, b) in pairs {
                adjacency.entry(edges[a]).or_default().push(edges[b]);
                adjacency.entry(edges[b]).or_default().push(edges[a]);
            }
        }
    }

    let mut visited: BTreeSet<EdgeKey> = BTreeSet::new();
    let mut paths = Vec::new();

    // Open paths start at edges with a single neighbour (grid boundary or masked cell).
    for (&start, neighbours) in &adjacency {
        if neighbours.len() == 1 && !visited.contains(&start) {
            let keys = walk(start, &adjacency, &mut visited);
            paths.push(ContourPath {
                closed: false,
                vertices: keys.iter().map(|k| points[k]).collect(),
            });
        }
    }

    // Whatever remains forms closed loops.
    for &start in adjacency.keys() {
        if visited.contains(&start) {
            continue;
        }
        let keys = walk(start, &adjacency, &mut visited);
        let mut vertices: Vec<(f64, f64)> = keys.iter().map(|k| points[k]).collect();
        if let Some(&first) = vertices.first() {
            vertices.push(first);
        }
        paths.push(ContourPath {
            closed: true,
            vertices,
        });
    }

    ContourSet { level, paths }
}

fn walk(start: EdgeKey, adjacency: &BTreeMap<EdgeKey, Vec<EdgeKey>>, visited: &mut BTreeSet<EdgeKey>) -> Vec<EdgeKey> {
    let mut keys = vec![start];
    visited.insert(start);
    let mut current = start;
    loop {
        let next = adjacency
            .get(&current)
            .and_then(|ns| ns.iter().copied().find(|n| !visited.contains(n)));
        match next {
            Some(n) => {
                visited.insert(n);
                keys.push(n);
                current = n;
            }
            None => break,
        }
    }
    keys
}

fn interpolate(
    x: &DMatrix<f64>,
    y: &DMatrix<f64>,
    z: &DMatrix<f64>,
    p: (usize, usize),
    q: (usize, usize),
    level: f64,
) -> (f64, f64) {
    let (zp, zq) = (z[p], z[q]);
    let t = (level - zp) / (zq - zp);
    (x[p] + t * (x[q] - x[p]), y[p] + t * (y[q] - y[p]))
}
