//! Formatted text output: tooltips and terminal reports.
//!
//! We keep formatting code in one place so output changes are localized and
//! the search/session code stays free of presentation details.

use chrono::NaiveDate;

use crate::domain::{DataSource, Dataset, LookupResult, PixelPoint};
use crate::io::ingest::RowError;
use crate::report::PointReport;

/// Long date as shown in reference-point tooltips, e.g. `Mon Jan 15 2024`.
pub fn fmt_long_date(d: NaiveDate) -> String {
    d.format("%a %b %d %Y").to_string()
}

/// Short date as shown in click tooltips, e.g. `1/15/2024`.
pub fn fmt_short_date(d: NaiveDate) -> String {
    d.format("%-m/%-d/%Y").to_string()
}

pub fn point_tooltip_lines(index: usize, result: Option<&LookupResult>) -> Vec<String> {
    let mut lines = vec![format!("Point Index: {}", index + 1)];
    match result {
        Some(r) => {
            lines.push(format!("Nearest Airline: {}", r.airline));
            lines.push(format!("Closest Date: {}", fmt_long_date(r.record.date)));
            lines.push(format!("Closest Price: ${:.2}", r.record.price));
            lines.push(format!("Distance: {:.2} pixels", r.distance));
        }
        None => lines.push("No nearby data".to_string()),
    }
    lines
}

pub fn click_tooltip_lines(result: &LookupResult) -> Vec<String> {
    vec![
        format!("Date: {}", fmt_short_date(result.record.date)),
        format!("Price: {:.2}", result.record.price),
        format!("Airline: {}", result.airline),
    ]
}

/// Dataset summary printed by `fares query`.
pub fn format_dataset_summary(source: &DataSource, dataset: &Dataset, row_errors: &[RowError]) -> String {
    let stats = dataset.stats();
    let mut out = String::new();

    out.push_str("=== fares - airline fare chart ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Records: n={} | dates=[{}, {}] | price=[{:.2}, {:.2}]\n",
        stats.n_records, stats.date_min, stats.date_max, stats.price_min, stats.price_max,
    ));
    for s in dataset.series() {
        out.push_str(&format!(
            "  {:<5} {:>4} records ({})\n",
            s.airline().code(),
            s.records().len(),
            s.airline().color().hex(),
        ));
    }

    if !row_errors.is_empty() {
        out.push_str(&format!("Skipped rows: {}\n", row_errors.len()));
        for e in row_errors.iter().take(5) {
            out.push_str(&format!("  line {}: {}\n", e.line, e.message));
        }
        if row_errors.len() > 5 {
            out.push_str(&format!("  ... and {} more\n", row_errors.len() - 5));
        }
    }

    out
}

/// One table row per reference point.
pub fn format_point_reports(reports: &[PointReport], cursor: usize) -> String {
    let mut out = String::new();
    out.push_str("Reference points (nearest segment end point):\n");
    out.push_str(&format!(
        "  {:>3}  {:>8} {:>8}  {:<7} {:<10} {:>9} {:>10}\n",
        "#", "x", "y", "airline", "date", "price", "dist(px)"
    ));

    for r in reports {
        let marker = if r.index == cursor { '>' } else { ' ' };
        match &r.result {
            Some(res) => out.push_str(&format!(
                "{marker} {:>3}  {:>8.2} {:>8.2}  {:<7} {:<10} {:>9.2} {:>10.2}\n",
                r.index + 1,
                r.query.x,
                r.query.y,
                res.airline.code(),
                res.record.date,
                res.record.price,
                res.distance,
            )),
            None => out.push_str(&format!(
                "{marker} {:>3}  {:>8.2} {:>8.2}  (no result)\n",
                r.index + 1,
                r.query.x,
                r.query.y,
            )),
        }
    }

    out
}

/// Click lookup as printed by `fares query --click`.
pub fn format_click_report(click: PixelPoint, result: Option<&LookupResult>) -> String {
    let mut out = format!("Click ({:.2}, {:.2}) (nearest in time):\n", click.x, click.y);
    match result {
        Some(r) => {
            for line in click_tooltip_lines(r) {
                out.push_str(&format!("  {line}\n"));
            }
            out.push_str(&format!("  Distance: {:.2} pixels\n", r.distance));
        }
        None => out.push_str("  No nearby data\n"),
    }
    out
}
