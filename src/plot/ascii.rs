//! ASCII preview of the parameter-space figure.
//!
//! Fixed-size character grid, deterministic so it can be golden-tested.
//! Used for `--show` when stdout is not a terminal.
//!
//! Plot elements:
//! - drag shading: `.:-=+*#%@` from low to high μ (blank where μ is missing)
//! - shear-stress contours: `T`, the 275 kPa limit: `!`
//! - contact-fraction contours: `S`
//! - operating point: `O`

use crate::domain::ContourSet;
use crate::figure::colormap::normalize;
use crate::figure::ParamSpaceFigure;

const RAMP: &[u8] = b".:-=+*#%@";

pub fn render_ascii_drag(figure: &ParamSpaceFigure, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let (x0, x1) = figure.x_range;
    let (y0, y1) = figure.y_range;
    let (lo, hi) = figure.style.drag_limits;

    let mut grid = vec![vec![' '; width]; height];
    for (row, line) in grid.iter_mut().enumerate() {
        let y = y1 - row as f64 / (height as f64 - 1.0) * (y1 - y0);
        for (col, cell) in line.iter_mut().enumerate() {
            let x = x0 + col as f64 / (width as f64 - 1.0) * (x1 - x0);
            if let Some(mu) = nearest_drag(figure, x, y).filter(|mu| mu.is_finite()) {
                let idx = (normalize(mu, lo, hi) * (RAMP.len() - 1) as f64).round() as usize;
                *cell = char::from(RAMP[idx.min(RAMP.len() - 1)]);
            }
        }
    }

    draw_contours(&mut grid, &figure.contact_contours, figure, 'S');
    draw_contours(&mut grid, &figure.shear_contours, figure, 'T');
    draw_contours(&mut grid, &figure.limit_contours, figure, '!');

    let style = &figure.style;
    let (v, n) = (style.operating_velocity, style.operating_marker);
    if (x0..=x1).contains(&v) && (y0..=y1).contains(&n) {
        let x = map_x(v, x0, x1, width);
        let y = map_y(n, y0, y1, height);
        grid[y][x] = 'O';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Drag: V=[{x0:.1}, {x1:.1}] m/a | N=[{y0:.0}, {y1:.0}] kPa | mu=[{lo:.2}, {hi:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("T shear stress | ! shear limit | S contact fraction | O operating point\n");
    out
}

/// Drag at the grid node closest to `(x, y)`, distances scaled by the axis spans.
fn nearest_drag(figure: &ParamSpaceFigure, x: f64, y: f64) -> Option<f64> {
    let sx = figure.x_range.1 - figure.x_range.0;
    let sy = figure.y_range.1 - figure.y_range.0;
    let (nr, nc) = figure.drag.shape();

    let mut best: Option<(f64, f64)> = None;
    for i in 0..nr {
        for j in 0..nc {
            let (vx, vy) = (figure.velocity[(i, j)], figure.pressure[(i, j)]);
            if !(vx.is_finite() && vy.is_finite()) {
                continue;
            }
            let d = ((vx - x) / sx).powi(2) + ((vy - y) / sy).powi(2);
            if best.is_none_or(|(bd, _)| d < bd) {
                best = Some((d, figure.drag[(i, j)]));
            }
        }
    }
    best.map(|(_, mu)| mu)
}

fn draw_contours(grid: &mut [Vec<char>], sets: &[ContourSet], figure: &ParamSpaceFigure, ch: char) {
    let height = grid.len();
    let width = grid[0].len();
    let (x0, x1) = figure.x_range;
    let (y0, y1) = figure.y_range;

    for path in sets.iter().flat_map(|s| &s.paths) {
        let mut prev: Option<(usize, usize)> = None;
        for &(x, y) in &path.vertices {
            if !((x0..=x1).contains(&x) && (y0..=y1).contains(&y)) {
                prev = None;
                continue;
            }
            let cur = (map_x(x, x0, x1, width), map_y(y, y0, y1, height));
            match prev {
                Some(p) => draw_line(grid, p, cur, ch),
                None => grid[cur.1][cur.0] = ch,
            }
            prev = Some(cur);
        }
    }
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y_max is row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Bresenham line, overwriting whatever is underneath.
fn draw_line(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), ch: char) {
    let (mut x0, mut y0) = (from.0 as isize, from.1 as isize);
    let (x1, y1) = (to.0 as isize, to.1 as isize);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            grid[y0 as usize][x0 as usize] = ch;
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::fixtures::synthetic_grids;
    use crate::figure::FigureStyle;
    use nalgebra::DMatrix;

    #[test]
    fn drag_golden_snapshot_small() {
        let figure = ParamSpaceFigure {
            velocity: DMatrix::from_row_slice(2, 2, &[0.0, 30.0, 0.0, 30.0]),
            pressure: DMatrix::from_row_slice(2, 2, &[100.0, 100.0, 900.0, 900.0]),
            drag: DMatrix::from_row_slice(2, 2, &[0.0, 0.35, 0.35, f64::NAN]),
            shear_contours: Vec::new(),
            limit_contours: Vec::new(),
            contact_contours: Vec::new(),
            shear_labels: Vec::new(),
            limit_labels: Vec::new(),
            contact_labels: Vec::new(),
            x_range: (0.0, 30.0),
            y_range: (100.0, 900.0),
            style: FigureStyle::default(),
        };

        let txt = render_ascii_drag(&figure, 10, 5);
        let expected = concat!(
            "Drag: V=[0.0, 30.0] m/a | N=[100, 900] kPa | mu=[0.00, 0.35]\n",
            "@@@@@     \n",
            "@@@@@     \n",
            ".....@@@@@\n",
            ".....O@@@@\n",
            ".....@@@@@\n",
            "T shear stress | ! shear limit | S contact fraction | O operating point\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn contours_are_overlaid() {
        let figure = ParamSpaceFigure::build(&synthetic_grids(), FigureStyle::default());
        let txt = render_ascii_drag(&figure, 60, 20);
        assert_eq!(txt.lines().count(), 22);
        assert!(txt.contains('T'));
        assert!(txt.contains('S'));
        assert!(txt.contains('!'));
        assert!(txt.contains('O'));
    }
}
