//! Plotters-powered parameter-space widget for Ratatui.
//!
//! Plotters output goes into the Ratatui buffer through
//! `plotters-ratatui-backend`, so the terminal view shares axis handling with
//! the file renderer.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{ContourLabel, ContourSet};
use crate::figure::colormap::{blues, normalize};
use crate::figure::ParamSpaceFigure;

/// Which layers of the figure to draw.
#[derive(Debug, Clone, Copy)]
pub struct Layers {
    pub drag: bool,
    pub shear: bool,
    pub contact: bool,
    pub labels: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            drag: true,
            shear: true,
            contact: true,
            labels: true,
        }
    }
}

pub struct ParamSpaceChart<'a> {
    pub figure: &'a ParamSpaceFigure,
    pub layers: Layers,
}

impl<'a> Widget for ParamSpaceChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters cannot lay out a chart in a handful of cells.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let figure = self.figure;
        let layers = self.layers;
        let (x0, x1) = figure.x_range;
        let (y0, y1) = figure.y_range;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("V (m/a)")
                .y_desc("N (kPa)")
                .x_labels(7)
                .y_labels(5)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            if layers.drag {
                let (lo, hi) = figure.style.drag_limits;
                let (nr, nc) = figure.drag.shape();
                let nodes = (0..nr).flat_map(|i| (0..nc).map(move |j| (i, j)));
                chart.draw_series(nodes.filter_map(|ij| {
                    let (v, n, mu) = (figure.velocity[ij], figure.pressure[ij], figure.drag[ij]);
                    let visible = mu.is_finite() && (x0..=x1).contains(&v) && (y0..=y1).contains(&n);
                    visible.then(|| Pixel::new((v, n), blues(normalize(mu, lo, hi))))
                }))?;
            }

            let mut contours: Vec<(&ContourSet, RGBColor)> = Vec::new();
            let mut labels: Vec<(&ContourLabel, RGBColor)> = Vec::new();
            if layers.shear {
                contours.extend(figure.shear_contours.iter().map(|s| (s, WHITE)));
                contours.extend(figure.limit_contours.iter().map(|s| (s, RED)));
                labels.extend(figure.shear_labels.iter().map(|l| (l, WHITE)));
                labels.extend(figure.limit_labels.iter().map(|l| (l, RED)));
            }
            if layers.contact {
                contours.extend(figure.contact_contours.iter().map(|s| (s, CYAN)));
                labels.extend(figure.contact_labels.iter().map(|l| (l, CYAN)));
            }
            for (set, color) in contours {
                for path in &set.paths {
                    chart.draw_series(LineSeries::new(path.vertices.iter().copied(), color))?;
                }
            }

            let style = &figure.style;
            let (n_lo, n_hi) = style.operating_pressure;
            chart.draw_series(LineSeries::new(
                [(style.operating_velocity, n_lo), (style.operating_velocity, n_hi)],
                RGBColor(255, 165, 0),
            ))?;

            if layers.labels {
                chart.draw_series(
                    labels
                        .into_iter()
                        .filter(|(l, _)| (x0..=x1).contains(&l.x) && (y0..=y1).contains(&l.y))
                        .map(|(l, color)| {
                            Text::new(l.text.clone(), (l.x, l.y), ("sans-serif", 10).into_font().color(&color))
                        }),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
