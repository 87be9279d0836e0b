//! Export reference-point lookups to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::path::Path;

use serde::Serialize;

use crate::error::AppError;
use crate::report::PointReport;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    index: usize,
    query_x: f64,
    query_y: f64,
    airline: &'a str,
    date: String,
    price: Option<f64>,
    distance_px: Option<f64>,
}

/// Write one CSV row per reference point; points without a result keep empty
/// airline/date/price/distance fields.
pub fn write_lookups_csv(path: &Path, reports: &[PointReport]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    for report in reports {
        let result = report.result.as_ref();
        let row = ExportRow {
            index: report.index + 1,
            query_x: report.query.x,
            query_y: report.query.y,
            airline: result.map(|r| r.airline.code()).unwrap_or(""),
            date: result.map(|r| r.record.date.to_string()).unwrap_or_default(),
            price: result.map(|r| r.record.price),
            distance_px: result.map(|r| r.distance),
        };
        writer
            .serialize(row)
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
