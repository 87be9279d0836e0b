//! CSV ingest and normalization.
//!
//! This module is responsible for turning a fare CSV (`date`, `price`,
//! `airline`) into a grouped [`Dataset`].
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{Airline, Dataset, Record};

/// Date format of the `date` column (month/day/two-digit year).
pub const DATE_FORMAT: &str = "%m/%d/%y";

const REQUIRED_COLUMNS: [&str; 3] = ["date", "price", "airline"];

/// Fatal ingest failures.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to open CSV '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read CSV headers: {0}")]
    Headers(#[source] csv::Error),
    #[error("Missing required column: `{0}`")]
    MissingColumn(&'static str),
    #[error("No valid rows in fare data ({rows_read} rows read).")]
    NoValidRows { rows_read: usize },
}

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: grouped dataset + row accounting.
#[derive(Debug, Clone)]
pub struct IngestedFares {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load a fare CSV from disk.
pub fn load_fares(path: &Path) -> Result<IngestedFares, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let ingested = read_fares(file)?;
    info!(
        path = %path.display(),
        rows_read = ingested.rows_read,
        rows_used = ingested.rows_used,
        series = ingested.dataset.series().len(),
        "loaded fare data"
    );
    Ok(ingested)
}

/// Parse fare CSV from any reader.
pub fn read_fares<R: Read>(reader: R) -> Result<IngestedFares, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(LoadError::Headers)?.clone();
    let header_map = build_header_map(&headers);
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(LoadError::MissingColumn(name));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let row = match result {
            Ok(r) => r,
            Err(e) => {
                let message = format!("CSV parse error: {e}");
                warn!(line, %message, "skipping fare row");
                row_errors.push(RowError { line, message });
                continue;
            }
        };

        match parse_row(&row, &header_map) {
            Ok(record) => records.push(record),
            Err(message) => {
                warn!(line, %message, "skipping fare row");
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = records.len();
    let dataset = Dataset::from_records(records).ok_or(LoadError::NoValidRows { rows_read })?;

    Ok(IngestedFares {
        dataset,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(row: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Record, String> {
    let date = parse_date(get_required(row, header_map, "date")?)?;
    let price = parse_price(get_required(row, header_map, "price")?)?;
    let airline = Airline::parse(get_required(row, header_map, "airline")?)
        .ok_or_else(|| "Missing required value: `airline`".to_string())?;
    Ok(Record { date, price, airline })
}

fn get_required<'a>(
    row: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    row.get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| format!("Invalid date '{s}' (expected MM/DD/YY): {e}"))
}

fn parse_price(s: &str) -> Result<f64, String> {
    let v = s
        .trim_start_matches('$')
        .parse::<f64>()
        .map_err(|_| format!("Invalid price '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite price '{s}'."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_groups_rows() {
        let csv = "date,price,airline\n\
                   01/05/24,20.5,AAL\n\
                   01/01/24,10,AAL\n\
                   01/03/24,$300.25,UAL\n";
        let out = read_fares(csv.as_bytes()).unwrap();
        assert_eq!(out.rows_read, 3);
        assert_eq!(out.rows_used, 3);
        assert!(out.row_errors.is_empty());

        let series = out.dataset.series();
        assert_eq!(series.len(), 2);
        assert_eq!(*series[0].airline(), Airline::Aal);
        assert_eq!(series[0].records()[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(series[1].records()[0].price, 300.25);
    }

    #[test]
    fn headers_are_case_insensitive_and_bom_tolerant() {
        let csv = "\u{feff}Date, Price ,AIRLINE,extra\n02/29/24,99,dal,x\n";
        let out = read_fares(csv.as_bytes()).unwrap();
        let record = &out.dataset.series()[0].records()[0];
        assert_eq!(record.airline, Airline::Dal);
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn bad_rows_are_reported_and_skipped() {
        let csv = "date,price,airline\n\
                   13/01/24,10,AAL\n\
                   01/02/24,abc,AAL\n\
                   01/03/24,5,\n\
                   01/04/24,7,UAL\n";
        let out = read_fares(csv.as_bytes()).unwrap();
        assert_eq!(out.rows_read, 4);
        assert_eq!(out.rows_used, 1);
        let lines: Vec<usize> = out.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn unreadable_rows_are_reported_and_skipped() {
        let mut csv = b"date,price,airline\n01/01/24,10,AAL\n01/02/24,".to_vec();
        csv.extend_from_slice(&[0xff, 0xfe]);
        csv.extend_from_slice(b",UAL\n01/03/24,12,AAL\n");
        let out = read_fares(csv.as_slice()).unwrap();
        assert_eq!(out.rows_read, 3);
        assert_eq!(out.rows_used, 2);
        assert_eq!(out.row_errors.len(), 1);
        assert_eq!(out.row_errors[0].line, 3);
        assert!(out.row_errors[0].message.starts_with("CSV parse error"));
    }

    #[test]
    fn missing_column_is_fatal() {
        let err = read_fares("date,price\n01/01/24,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("airline")));
    }

    #[test]
    fn no_valid_rows_is_fatal() {
        let err = read_fares("date,price,airline\nnope,1,AAL\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::NoValidRows { rows_read: 1 }));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = load_fares(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
