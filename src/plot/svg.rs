//! SVG export of the full chart.
//!
//! Draws the chart at its configured size (1200×500 by default): month-ticked
//! time axis, price axis, axis titles, one line per airline, the reference
//! points (current one highlighted), the click markers and the active tooltip.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::axis::{X_AXIS_TITLE, Y_AXIS_TITLE, fmt_month, fmt_price_tick, month_ticks, price_ticks};
use crate::domain::{PixelPoint, Rgb};
use crate::error::AppError;
use crate::session::Session;

type SvgArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type SvgResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

const TICK_LEN: i32 = 6;
const POINT_RADIUS: i32 = 5;
const REFERENCE_COLOR: RGBColor = RGBColor(255, 0, 0);
const CURRENT_COLOR: RGBColor = RGBColor(255, 165, 0);
const TOOLTIP_BG: RGBColor = RGBColor(70, 130, 180);

/// Render the session's chart to an SVG file.
pub fn render_svg(path: &Path, session: &Session) -> Result<(), AppError> {
    let layout = session.layout();
    let root = SVGBackend::new(path, (layout.width, layout.height)).into_drawing_area();
    draw_chart(&root, session)
        .and_then(|_| root.present())
        .map_err(|e| AppError::new(4, format!("Failed to render SVG '{}': {e}", path.display())))
}

fn draw_chart(root: &SvgArea<'_>, session: &Session) -> SvgResult {
    let layout = session.layout();
    let m = layout.margin;
    root.fill(&WHITE)?;

    draw_axes(root, session)?;

    // Plot area shares the drawable-area pixel space used by the scales.
    let plot = root.margin(m.top, m.bottom, m.left, m.right);
    let scales = session.scales();

    for series in session.dataset().series() {
        let points: Vec<(i32, i32)> = series.records().iter().map(|r| px(scales.project(r))).collect();
        plot.draw(&PathElement::new(points, rgb(series.airline().color()).stroke_width(2)))?;
    }

    for (i, &p) in session.points().iter().enumerate() {
        let color = if i == session.cursor() { CURRENT_COLOR } else { REFERENCE_COLOR };
        plot.draw(&Circle::new(px(p), POINT_RADIUS, color.filled()))?;
    }

    if let Some(p) = session.click_marker() {
        plot.draw(&Circle::new(px(p), POINT_RADIUS, BLACK.mix(0.5).filled()))?;
        plot.draw(&Circle::new(px(p), POINT_RADIUS, WHITE.stroke_width(1)))?;
    }
    if let Some(p) = session.data_marker() {
        plot.draw(&Circle::new(px(p), POINT_RADIUS, RED.filled()))?;
        plot.draw(&Circle::new(px(p), POINT_RADIUS, WHITE.stroke_width(1)))?;
    }

    if let Some(tooltip) = session.tooltip() {
        draw_tooltip(root, tooltip.anchor, &tooltip.lines)?;
    }

    Ok(())
}

fn draw_axes(root: &SvgArea<'_>, session: &Session) -> SvgResult {
    let layout = session.layout();
    let m = layout.margin;
    let (left, top) = (m.left as i32, m.top as i32);
    let bottom = top + layout.inner_height().round() as i32;
    let right = left + layout.inner_width().round() as i32;
    let scales = session.scales();
    let stats = session.dataset().stats();

    let axis_style = BLACK.stroke_width(1);
    root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], axis_style))?;
    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], axis_style))?;

    let label_font = ("sans-serif", 10).into_font();

    for d in month_ticks(stats.date_min, stats.date_max) {
        let x = left + scales.time.date_to_px(d).round() as i32;
        root.draw(&PathElement::new(vec![(x, bottom), (x, bottom + TICK_LEN)], axis_style))?;
        root.draw(&Text::new(
            fmt_month(d),
            (x, bottom + TICK_LEN + 3),
            label_font.clone().color(&BLACK).pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }

    for v in price_ticks(scales.price.max(), 10) {
        let y = top + scales.price.to_px(v).round() as i32;
        root.draw(&PathElement::new(vec![(left - TICK_LEN, y), (left, y)], axis_style))?;
        root.draw(&Text::new(
            fmt_price_tick(v),
            (left - TICK_LEN - 3, y),
            label_font.clone().color(&BLACK).pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
    }

    let title_font = ("sans-serif", 14).into_font();
    root.draw(&Text::new(
        X_AXIS_TITLE,
        ((layout.inner_width() / 2.0).round() as i32 + left, bottom + 50),
        title_font.clone().color(&BLACK).pos(Pos::new(HPos::Right, VPos::Bottom)),
    ))?;
    root.draw(&Text::new(
        Y_AXIS_TITLE,
        (30, top + (layout.inner_height() / 2.0).round() as i32),
        title_font
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center)),
    ))?;

    Ok(())
}

fn draw_tooltip(root: &SvgArea<'_>, anchor: PixelPoint, lines: &[String]) -> SvgResult {
    const LINE_HEIGHT: i32 = 16;
    const PADDING: i32 = 10;
    const CHAR_WIDTH: i32 = 7;

    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as i32;
    let (x0, y0) = (anchor.x.round() as i32, anchor.y.round() as i32);
    let x1 = x0 + longest * CHAR_WIDTH + 2 * PADDING;
    let y1 = y0 + lines.len() as i32 * LINE_HEIGHT + 2 * PADDING;

    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], TOOLTIP_BG.mix(0.75).filled()))?;
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], WHITE.stroke_width(1)))?;

    let font = ("sans-serif", 12).into_font();
    for (i, line) in lines.iter().enumerate() {
        root.draw(&Text::new(
            line.as_str(),
            (x0 + PADDING, y0 + PADDING + i as i32 * LINE_HEIGHT),
            font.clone().color(&WHITE).pos(Pos::new(HPos::Left, VPos::Top)),
        ))?;
    }
    Ok(())
}

fn px(p: PixelPoint) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}
