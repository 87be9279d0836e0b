//! Plotters-powered fare chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.
//! The cartesian spans the drawable-area pixel space exactly (no margins, no
//! label areas) so terminal cells map linearly onto chart pixels; tick labels
//! are drawn by the caller around the widget.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::{PixelPoint, Rgb};

/// One polyline in drawable-area pixels.
pub struct ChartLine {
    pub color: Rgb,
    pub points: Vec<PixelPoint>,
}

/// A render-only chart description; all geometry is computed by the caller.
pub struct FareChart<'a> {
    pub lines: &'a [ChartLine],
    pub points: &'a [PixelPoint],
    /// Index into `points` drawn in the highlight color.
    pub cursor: usize,
    pub click_marker: Option<PixelPoint>,
    pub data_marker: Option<PixelPoint>,
    /// Drawable-area size in pixels.
    pub width: f64,
    pub height: f64,
}

impl<'a> Widget for FareChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let (w, h) = (self.width, self.height);
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return;
        }

        // Braille canvas resolution: 2 dots per cell horizontally, 4 vertically.
        let dot_w = w / (f64::from(area.width) * 2.0);
        let dot_h = h / (f64::from(area.height) * 4.0);
        // Pixel space grows downward; the cartesian grows upward.
        let flip = move |p: PixelPoint| (p.x, h - p.y);

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root).margin(0).build_cartesian_2d(0.0..w, 0.0..h)?;

            for line in self.lines {
                let color = RGBColor(line.color.0, line.color.1, line.color.2);
                chart.draw_series(LineSeries::new(line.points.iter().map(|&p| flip(p)), &color))?;
            }

            // We avoid `Circle` markers: the ratatui backend maps circle radii
            // incorrectly. A small cross of `Pixel`s reads well in a terminal.
            let reference = RGBColor(255, 0, 0);
            let current = RGBColor(255, 165, 0);
            for (i, &p) in self.points.iter().enumerate() {
                if i == self.cursor {
                    chart.draw_series(cross(flip(p), dot_w, dot_h).map(|c| Pixel::new(c, current)))?;
                } else {
                    chart.draw_series(std::iter::once(Pixel::new(flip(p), reference)))?;
                }
            }

            if let Some(p) = self.click_marker {
                chart.draw_series(cross(flip(p), dot_w, dot_h).map(|c| Pixel::new(c, WHITE)))?;
            }
            if let Some(p) = self.data_marker {
                chart.draw_series(cross(flip(p), dot_w, dot_h).map(|c| Pixel::new(c, RGBColor(255, 0, 0))))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn cross((x, y): (f64, f64), dx: f64, dy: f64) -> impl Iterator<Item = (f64, f64)> {
    [(x, y), (x - dx, y), (x + dx, y), (x, y - dy), (x, y + dy)].into_iter()
}
