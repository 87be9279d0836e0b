//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - airline lines: one glyph per airline (`a`, `u`, `d`, `*`)
//! - reference points: `o`, the current one `@`
//! - click marker `x`, nearest data point `#`

use crate::domain::PixelPoint;
use crate::session::Session;

/// Render the session's chart on a `width` × `height` character grid.
pub fn render_ascii_chart(session: &Session, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);
    let layout = session.layout();
    let (w, h) = (layout.inner_width(), layout.inner_height());
    let scales = session.scales();

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers can overlay.
    for series in session.dataset().series() {
        let glyph = series.airline().glyph();
        let mut prev = None;
        for record in series.records() {
            let p = scales.project(record);
            let cell = (map_x(p.x, w, width), map_y(p.y, h, height));
            match prev {
                Some((x0, y0)) => draw_line(&mut grid, x0, y0, cell.0, cell.1, glyph),
                None => put_if_empty(&mut grid, cell.0, cell.1, glyph),
            }
            prev = Some(cell);
        }
    }

    for (i, &p) in session.points().iter().enumerate() {
        let ch = if i == session.cursor() { '@' } else { 'o' };
        put(&mut grid, p, w, h, ch);
    }
    if let Some(p) = session.click_marker() {
        put(&mut grid, p, w, h, 'x');
    }
    if let Some(p) = session.data_marker() {
        put(&mut grid, p, w, h, '#');
    }

    let stats = session.dataset().stats();
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{}, {}] | price=[0.00, {:.2}]\n",
        stats.date_min,
        stats.date_max,
        scales.price.max(),
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let legend: Vec<String> = session
        .dataset()
        .series()
        .iter()
        .map(|s| format!("{}={}", s.airline().glyph(), s.airline()))
        .collect();
    out.push_str(&format!("Legend: {}  o=reference  @=current\n", legend.join(" ")));

    out
}

fn put(grid: &mut [Vec<char>], p: PixelPoint, w: f64, h: f64, ch: char) {
    let height = grid.len();
    let width = grid[0].len();
    grid[map_y(p.y, h, height)][map_x(p.x, w, width)] = ch;
}

fn put_if_empty(grid: &mut [Vec<char>], x: usize, y: usize, ch: char) {
    if grid[y][x] == ' ' {
        grid[y][x] = ch;
    }
}

fn map_x(px: f64, w: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = (px / w).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(py: f64, h: f64, height: usize) -> usize {
    // Pixel space already has row 0 at the top.
    let height = height.max(2);
    let u = (py / h).clamp(0.0, 1.0);
    (u * (height as f64 - 1.0)).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
            put_if_empty(grid, x0 as usize, y0 as usize, ch);
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
    use chrono::NaiveDate;

    use crate::domain::{Airline, ChartLayout, Dataset, Record};

    #[test]
    fn plot_golden_snapshot_small() {
        let records = vec![
            Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                price: 10.0,
                airline: Airline::Aal,
            },
            Record {
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                price: 20.0,
                airline: Airline::Aal,
            },
        ];
        let ds = Dataset::from_records(records).unwrap();
        let points = vec![PixelPoint::new(545.0, 370.0), PixelPoint::new(1090.0, 370.0)];
        let mut session = Session::new(ds, ChartLayout::default(), points).unwrap();
        session.start();

        let txt = render_ascii_chart(&session, 10, 5);
        let expected = concat!(
            "Plot: dates=[2024-01-01, 2024-01-10] | price=[0.00, 20.00]\n",
            "       aaa\n",
            "   aaaa   \n",
            "aaa       \n",
            "          \n",
            "     @   o\n",
            "Legend: a=AAL  o=reference  @=current\n",
        );
        assert_eq!(txt, expected);
    }
}
