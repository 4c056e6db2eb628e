//! Drawing the parameter-space figure with plotters.
//!
//! Everything here is presentation. Sizes are specified in points and scaled
//! by `dpi / 72` so PNG and SVG output match at any resolution.

use std::path::{Path, PathBuf};

use log::{debug, info};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::domain::{ContourLabel, ContourSet, Dpi, FigureConfig, OutputFormat};
use crate::error::{AppError, RenderError};

use super::colormap::{blues, normalize};
use super::ParamSpaceFigure;

const X_DESC: &str = "Linear Sliding Velocity [V] (m a⁻¹)";
const Y_DESC: &str = "Effective Pressure [N] (kPa)";
const COLORBAR_DESC: &str = "Drag (μ) [ - ]";
const ORANGE: RGBColor = RGBColor(255, 165, 0);

/// `<output_dir>/JGLAC_Fig02_<fdpi|Ndpi>.<ext>`.
pub fn output_path(config: &FigureConfig) -> PathBuf {
    config.output_dir.join(format!(
        "JGLAC_Fig02_{}.{}",
        config.dpi.file_tag(),
        config.format.extension()
    ))
}

/// Render and (unless `render_only`) save the figure.
///
/// Returns the written path, or `None` when nothing was written.
pub fn render_figure(figure: &ParamSpaceFigure, config: &FigureConfig) -> Result<Option<PathBuf>, AppError> {
    if !config.dpi.within_limit() {
        return Err(RenderError::Resolution(config.dpi.value()).into());
    }
    if config.render_only {
        render_in_memory(figure, config.dpi)?;
        info!("render-only: figure drawn, nothing written");
        return Ok(None);
    }

    let path = output_path(config);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create output directory {}: {e}", parent.display())))?;
    }

    render_to_file(figure, &path, config.format, config.dpi)?;
    info!("figure written to {}", path.display());
    Ok(Some(path))
}

/// Draw into a scratch RGB buffer; checks the figure can be drawn without touching disk.
pub fn render_in_memory(figure: &ParamSpaceFigure, dpi: Dpi) -> Result<Vec<u8>, RenderError> {
    let (w, h) = dpi.pixel_size();
    let mut buffer = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        draw_param_space(&root, figure, points_to_pixels(dpi))?;
        root.present()?;
    }
    Ok(buffer)
}

pub fn render_to_file(
    figure: &ParamSpaceFigure,
    path: &Path,
    format: OutputFormat,
    dpi: Dpi,
) -> Result<(), RenderError> {
    let size = dpi.pixel_size();
    let scale = points_to_pixels(dpi);
    debug!("rendering {}x{} px ({} dpi) to {}", size.0, size.1, dpi.value(), path.display());

    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_param_space(&root, figure, scale)?;
            root.present()?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_param_space(&root, figure, scale)?;
            root.present()?;
        }
        OutputFormat::Pdf => return Err(RenderError::Unsupported("pdf".to_string())),
    }
    Ok(())
}

fn points_to_pixels(dpi: Dpi) -> f64 {
    f64::from(dpi.value()) / 72.0
}

fn font(size_pt: f64, scale: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::SansSerif, size_pt * scale, FontStyle::Normal)
}

/// Draw the full figure (heatmap, contours, annotations, colorbar) onto `root`.
///
/// `scale` is pixels per point.
pub fn draw_param_space<DB>(
    root: &DrawingArea<DB, Shift>,
    figure: &ParamSpaceFigure,
    scale: f64,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (width, _) = root.dim_in_pixel();
    let (main, bar) = root.split_horizontally((f64::from(width) * 0.84) as i32);

    let style = &figure.style;
    let (x0, x1) = figure.x_range;
    let (y0, y1) = figure.y_range;
    let px = |pt: f64| (pt * scale).round().max(1.0) as u32;

    let mut chart = ChartBuilder::on(&main)
        .margin_top(px(12.0))
        .margin_right(px(6.0))
        .x_label_area_size(px(30.0))
        .y_label_area_size(px(40.0))
        .build_cartesian_2d(x0..x1, y0..y1)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(X_DESC)
        .y_desc(Y_DESC)
        .x_labels(7)
        .y_labels(9)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style(font(10.0, scale))
        .axis_desc_style(font(10.0, scale))
        .draw()?;

    // Pixels per data unit, for dash patterns and marker shapes.
    let (plot_w, plot_h) = chart.plotting_area().dim_in_pixel();
    let data_scale = (f64::from(plot_w) / (x1 - x0), f64::from(plot_h) / (y1 - y0));

    let (lo, hi) = style.drag_limits;
    chart.draw_series(figure.drag_cells().into_iter().map(|(quad, mu)| {
        let clipped = quad.map(|(x, y)| (x.clamp(x0, x1), y.clamp(y0, y1))).to_vec();
        Polygon::new(clipped, blues(normalize(mu, lo, hi)).filled())
    }))?;

    let solid = BLACK.stroke_width(px(1.0));
    for set in &figure.shear_contours {
        for run in contour_runs(set, figure) {
            chart.draw_series(std::iter::once(PathElement::new(run, solid)))?;
        }
    }

    let dashed = RED.stroke_width(px(1.0));
    for set in &figure.limit_contours {
        for run in contour_runs(set, figure) {
            let dashes = dash_segments(&run, 3.7 * scale, 1.6 * scale, data_scale);
            chart.draw_series(dashes.into_iter().map(|d| PathElement::new(d, dashed)))?;
        }
    }

    let dotted = WHITE.stroke_width(px(1.0));
    for set in &figure.contact_contours {
        for run in contour_runs(set, figure) {
            let dots = dash_segments(&run, scale, 1.65 * scale, data_scale);
            chart.draw_series(dots.into_iter().map(|d| PathElement::new(d, dotted)))?;
        }
    }

    // Operating range for N(t) at the centerline velocity.
    let v_op = style.operating_velocity;
    let (n_lo, n_hi) = style.operating_pressure;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(v_op, n_lo), (v_op, n_hi)],
        ORANGE.stroke_width(px(4.0)),
    )))?;
    let r = 7.0 * scale;
    let (rx, ry) = (r / data_scale.0, r / data_scale.1);
    let m = style.operating_marker;
    chart.draw_series(std::iter::once(Polygon::new(
        vec![(v_op, m + ry), (v_op + rx * 0.6, m), (v_op, m - ry), (v_op - rx * 0.6, m)],
        ORANGE.filled(),
    )))?;

    let line_height = (12.0 * scale).round() as i32;
    let (ax, ay) = style.no_cavity_anchor;
    let left_mid = font(10.0, scale).color(&BLACK).pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(std::iter::once(
        EmptyElement::at((ax, ay))
            + Text::new("No Cavities", (0, -line_height / 2), left_mid.clone())
            + Text::new("(S = 1)", (0, line_height / 2), left_mid),
    ))?;

    let (zx0, zx1, zy0, zy1) = style.min_velocity_zone;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(zx0.clamp(x0, x1), zy0.clamp(y0, y1)), (zx1.clamp(x0, x1), zy1.clamp(y0, y1))],
        BLACK.mix(0.1).filled(),
    )))?;

    let centered = |color: &RGBColor| font(10.0, scale).color(color).pos(Pos::new(HPos::Center, VPos::Center));
    draw_labels(&mut chart, &figure.shear_labels, centered(&BLACK), figure)?;
    draw_labels(&mut chart, &figure.limit_labels, centered(&RED), figure)?;
    draw_labels(&mut chart, &figure.contact_labels, centered(&WHITE), figure)?;

    draw_colorbar(&bar, lo, hi, scale)?;
    Ok(())
}

fn draw_labels<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    labels: &[ContourLabel],
    style: TextStyle<'_>,
    figure: &ParamSpaceFigure,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    chart.draw_series(
        labels
            .iter()
            .filter(|l| in_range(l.x, l.y, figure))
            .map(|l| Text::new(l.text.clone(), (l.x, l.y), style.clone())),
    )?;
    Ok(())
}

fn draw_colorbar<DB>(area: &DrawingArea<DB, Shift>, lo: f64, hi: f64, scale: f64) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let px = |pt: f64| (pt * scale).round().max(1.0) as u32;
    let mut bar = ChartBuilder::on(area)
        .margin_top(px(12.0))
        .margin_bottom(px(30.0))
        .margin_left(px(4.0))
        .set_label_area_size(LabelAreaPosition::Right, px(38.0))
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(8)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .y_desc(COLORBAR_DESC)
        .label_style(font(10.0, scale))
        .axis_desc_style(font(10.0, scale))
        .draw()?;

    let steps = 64;
    let step = (hi - lo) / f64::from(steps);
    bar.draw_series((0..steps).map(|k| {
        let y = lo + step * f64::from(k);
        let color = blues(normalize(y + 0.5 * step, lo, hi));
        Rectangle::new([(0.0, y), (1.0, y + step)], color.filled())
    }))?;
    Ok(())
}

/// Contour paths clipped to the axes, split wherever a vertex falls outside.
fn contour_runs(set: &ContourSet, figure: &ParamSpaceFigure) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    for path in &set.paths {
        let mut current = Vec::new();
        for &(x, y) in &path.vertices {
            if in_range(x, y, figure) {
                current.push((x, y));
            } else if current.len() > 1 {
                runs.push(std::mem::take(&mut current));
            } else {
                current.clear();
            }
        }
        if current.len() > 1 {
            runs.push(current);
        }
    }
    runs
}

fn in_range(x: f64, y: f64, figure: &ParamSpaceFigure) -> bool {
    let (x0, x1) = figure.x_range;
    let (y0, y1) = figure.y_range;
    (x0..=x1).contains(&x) && (y0..=y1).contains(&y)
}

/// Split a polyline into dashes of length `on` separated by gaps of `off`.
///
/// Lengths are measured after scaling coordinates by `scale = (sx, sy)`
/// (typically pixels per data unit); returned vertices stay in data units.
pub fn dash_segments(path: &[(f64, f64)], on: f64, off: f64, scale: (f64, f64)) -> Vec<Vec<(f64, f64)>> {
    if path.len() < 2 {
        return Vec::new();
    }
    if on.is_nan() || on <= 0.0 || off.is_nan() || off < 0.0 {
        return vec![path.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current: Vec<(f64, f64)> = vec![path[0]];
    let mut drawing = true;
    let mut remaining = on;

    for pair in path.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let seg_len = ((b.0 - a.0) * scale.0).hypot((b.1 - a.1) * scale.1);
        if seg_len == 0.0 || !seg_len.is_finite() {
            continue;
        }
        let mut t = 0.0;
        while (1.0 - t) * seg_len > remaining {
            t += remaining / seg_len;
            let p = (a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1));
            if drawing {
                current.push(p);
                dashes.push(std::mem::take(&mut current));
                remaining = off;
            } else {
                current.push(p);
                remaining = on;
            }
            drawing = !drawing;
        }
        remaining -= (1.0 - t) * seg_len;
        if drawing {
            current.push(b);
        } else {
            current.clear();
        }
    }
    if drawing && current.len() > 1 {
        dashes.push(current);
    }
    dashes
}
