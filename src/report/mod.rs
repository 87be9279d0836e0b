//! Reporting utilities: per-point lookups and formatted terminal output.

use serde::Serialize;

use crate::domain::{LookupResult, PixelPoint};
use crate::session::Session;

pub mod format;

pub use format::*;

/// Lookup for one reference point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReport {
    /// Zero-based position in the reference-point sequence.
    pub index: usize,
    pub query: PixelPoint,
    pub result: Option<LookupResult>,
}

/// Run the endpoint lookup for every reference point of the session.
pub fn point_reports(session: &Session) -> Vec<PointReport> {
    session
        .points()
        .iter()
        .enumerate()
        .map(|(index, &query)| PointReport {
            index,
            query,
            result: session.lookup_point(index),
        })
        .collect()
}
