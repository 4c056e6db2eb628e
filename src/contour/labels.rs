//! Manual contour label placement.
//!
//! Each level gets at most one label. It sits at a fixed target x, at the
//! height of the primary path's vertex whose x is closest to that target, so
//! a family of labels stays stacked in one column.

use crate::domain::{ContourLabel, ContourPath, ContourSet};

/// How a contour level is rendered as label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFormat {
    /// Integer kilopascals, e.g. `125 kPa`.
    Kilopascal,
    /// One decimal place, e.g. `0.3`.
    OneDecimal,
}

impl LabelFormat {
    pub fn text(self, level: f64) -> String {
        match self {
            LabelFormat::Kilopascal => format!("{} kPa", level.trunc() as i64),
            LabelFormat::OneDecimal => format!("{level:.1}"),
        }
    }
}

/// The path with the most vertices (the first one on ties).
pub fn primary_path(set: &ContourSet) -> Option<&ContourPath> {
    set.paths.iter().fold(None, |best: Option<&ContourPath>, p| match best {
        Some(b) if b.vertices.len() >= p.vertices.len() => Some(b),
        _ => Some(p),
    })
}

/// Vertex of `path` whose x coordinate is nearest to `target_x`.
pub fn nearest_vertex(path: &ContourPath, target_x: f64) -> Option<(f64, f64)> {
    path.vertices
        .iter()
        .copied()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .min_by(|a, b| {
            (a.0 - target_x)
                .abs()
                .partial_cmp(&(b.0 - target_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// One label per level that has a path, anchored at `(target_x, y)` of the nearest vertex.
pub fn place_labels(sets: &[ContourSet], target_x: f64, format: LabelFormat) -> Vec<ContourLabel> {
    sets.iter()
        .filter_map(|set| {
            let path = primary_path(set)?;
            let (_, y) = nearest_vertex(path, target_x)?;
            Some(ContourLabel {
                level: set.level,
                text: format.text(set.level),
                x: target_x,
                y,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(vertices: &[(f64, f64)]) -> ContourPath {
        ContourPath {
            closed: false,
            vertices: vertices.to_vec(),
        }
    }

    #[test]
    fn label_text_formats() {
        assert_eq!(LabelFormat::Kilopascal.text(125.0), "125 kPa");
        assert_eq!(LabelFormat::Kilopascal.text(275.0), "275 kPa");
        assert_eq!(LabelFormat::OneDecimal.text(0.30000000000000004), "0.3");
    }

    #[test]
    fn nearest_vertex_picks_closest_x() {
        let p = path(&[(0.0, 100.0), (10.0, 200.0), (22.0, 300.0), (25.0, 400.0)]);
        assert_eq!(nearest_vertex(&p, 23.0), Some((22.0, 300.0)));
        assert_eq!(nearest_vertex(&p, -5.0), Some((0.0, 100.0)));
        assert_eq!(nearest_vertex(&path(&[]), 1.0), None);
    }

    #[test]
    fn labels_use_longest_path_and_skip_empty_levels() {
        let sets = vec![
            ContourSet {
                level: 50.0,
                paths: vec![
                    path(&[(1.0, 1.0), (2.0, 2.0)]),
                    path(&[(20.0, 500.0), (23.5, 520.0), (30.0, 560.0)]),
                ],
            },
            ContourSet {
                level: 75.0,
                paths: Vec::new(),
            },
        ];
        let labels = place_labels(&sets, 23.0, LabelFormat::Kilopascal);
        assert_eq!(
            labels,
            vec![ContourLabel {
                level: 50.0,
                text: "50 kPa".to_string(),
                x: 23.0,
                y: 520.0,
            }]
        );
    }

    #[test]
    fn labels_share_target_column_when_vertices_miss_it() {
        let sets = vec![
            ContourSet {
                level: 100.0,
                paths: vec![path(&[(20.0, 400.0), (22.4, 410.0), (26.0, 430.0)])],
            },
            ContourSet {
                level: 125.0,
                paths: vec![path(&[(21.0, 500.0), (24.1, 515.0)])],
            },
        ];
        let labels = place_labels(&sets, 23.0, LabelFormat::Kilopascal);
        assert_eq!(labels.len(), 2);
        assert!(labels.iter().all(|l| l.x == 23.0));
        assert_eq!(labels[0].y, 410.0);
        assert_eq!(labels[1].y, 515.0);
    }

    #[test]
    fn primary_path_prefers_first_on_ties() {
        let set = ContourSet {
            level: 0.5,
            paths: vec![path(&[(1.0, 0.0), (2.0, 0.0)]), path(&[(3.0, 0.0), (4.0, 0.0)])],
        };
        assert_eq!(primary_path(&set).unwrap().vertices[0], (1.0, 0.0));
    }
}
