//! Debug bundle writer for inspecting a chart session.
//!
//! Dumps the dataset summary, every reference-point lookup and the current
//! markers/tooltip to a markdown file under `debug/`.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use crate::domain::DataSource;
use crate::error::AppError;
use crate::report::point_reports;
use crate::session::Session;

pub fn write_debug_bundle(session: &Session, source: &DataSource) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("fares_debug_{ts}.md"));

    let mut file = File::create(&path).map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    write_bundle(&mut file, session, source).map_err(|e| AppError::new(4, format!("Failed to write debug: {e}")))?;

    info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}

fn write_bundle<W: Write>(out: &mut W, session: &Session, source: &DataSource) -> std::io::Result<()> {
    let stats = session.dataset().stats();
    let layout = session.layout();
    let scales = session.scales();

    writeln!(out, "# fares debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- source: {source}")?;
    writeln!(out, "- records: {}", stats.n_records)?;
    writeln!(out, "- dates: {} .. {}", stats.date_min, stats.date_max)?;
    writeln!(out, "- prices: {:.2} .. {:.2} (axis max {:.2})", stats.price_min, stats.price_max, scales.price.max())?;
    writeln!(
        out,
        "- layout: {}x{} (drawable {:.0}x{:.0})",
        layout.width,
        layout.height,
        layout.inner_width(),
        layout.inner_height()
    )?;

    writeln!(out, "\n## Series")?;
    writeln!(out, "| airline | color | n | first | last |")?;
    writeln!(out, "| - | - | - | - | - |")?;
    for s in session.dataset().series() {
        let first = s.records().first().map(|r| r.date.to_string()).unwrap_or_default();
        let last = s.records().last().map(|r| r.date.to_string()).unwrap_or_default();
        writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            s.airline(),
            s.airline().color().hex(),
            s.records().len(),
            first,
            last
        )?;
    }

    writeln!(out, "\n## Reference points")?;
    writeln!(out, "| # | x | y | airline | date | price | distance |")?;
    writeln!(out, "| - | - | - | - | - | - | - |")?;
    for r in point_reports(session) {
        let current = if r.index == session.cursor() { " *" } else { "" };
        match &r.result {
            Some(res) => writeln!(
                out,
                "| {}{} | {:.2} | {:.2} | {} | {} | {:.2} | {:.3} |",
                r.index + 1,
                current,
                r.query.x,
                r.query.y,
                res.airline,
                res.record.date,
                res.record.price,
                res.distance
            )?,
            None => writeln!(
                out,
                "| {}{} | {:.2} | {:.2} | - | - | - | - |",
                r.index + 1,
                current,
                r.query.x,
                r.query.y
            )?,
        }
    }

    writeln!(out, "\n## Markers")?;
    writeln!(out, "- click: {}", fmt_marker(session.click_marker()))?;
    writeln!(out, "- data: {}", fmt_marker(session.data_marker()))?;
    if let Some(tooltip) = session.tooltip() {
        writeln!(out, "\n## Tooltip at ({:.1}, {:.1})", tooltip.anchor.x, tooltip.anchor.y)?;
        for line in &tooltip.lines {
            writeln!(out, "    {line}")?;
        }
    }

    Ok(())
}

fn fmt_marker(p: Option<crate::domain::PixelPoint>) -> String {
    match p {
        Some(p) => format!("({:.2}, {:.2})", p.x, p.y),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_demo_fares, generate_reference_points, reference_rng};
    use crate::domain::{ChartLayout, Dataset};
    use crate::session::Event;

    #[test]
    fn bundle_lists_points_and_markers() {
        let ds = Dataset::from_records(generate_demo_fares(3).unwrap()).unwrap();
        let layout = ChartLayout::default();
        let points = generate_reference_points(4, &layout, &mut reference_rng(Some(3)));
        let mut session = Session::new(ds, layout, points).unwrap();
        session.start();
        session.dispatch(Event::Click { x: 500.0, y: 100.0 });

        let mut buf = Vec::new();
        write_bundle(&mut buf, &session, &DataSource::Demo { seed: 3 }).unwrap();
        let txt = String::from_utf8(buf).unwrap();

        assert!(txt.contains("- source: demo fares (seed 3)"));
        assert!(txt.contains("| 1 * |"));
        assert!(txt.contains("| 4 |"));
        assert!(txt.contains("- click: (500.00, 100.00)"));
        assert!(txt.contains("    Airline: "));
    }
}
