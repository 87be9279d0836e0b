//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory by the scales, the nearest-point searches and the session
//! - exported to JSON/CSV by `fares query`

use std::fmt;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};

/// Airline category code.
///
/// The three carriers in the fare dataset have fixed display colors; any other
/// code is kept verbatim and drawn with a fallback color.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Airline {
    Aal,
    Ual,
    Dal,
    Other(String),
}

impl Airline {
    pub const KNOWN: [Airline; 3] = [Airline::Aal, Airline::Ual, Airline::Dal];

    /// Parse a category code. Known codes match case-insensitively.
    ///
    /// Returns `None` for an empty code.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            return None;
        }
        let airline = match code.to_ascii_uppercase().as_str() {
            "AAL" => Airline::Aal,
            "UAL" => Airline::Ual,
            "DAL" => Airline::Dal,
            _ => Airline::Other(code.to_string()),
        };
        Some(airline)
    }

    pub fn code(&self) -> &str {
        match self {
            Airline::Aal => "AAL",
            Airline::Ual => "UAL",
            Airline::Dal => "DAL",
            Airline::Other(code) => code,
        }
    }

    /// Line color for this airline.
    pub fn color(&self) -> Rgb {
        match self {
            Airline::Aal => Rgb::GRAY,
            Airline::Ual => Rgb::STEELBLUE,
            Airline::Dal => Rgb::FIREBRICK,
            Airline::Other(_) => Rgb::FALLBACK,
        }
    }

    /// Single-character glyph used by the ASCII plot.
    pub fn glyph(&self) -> char {
        match self {
            Airline::Aal => 'a',
            Airline::Ual => 'u',
            Airline::Dal => 'd',
            Airline::Other(_) => '*',
        }
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Airline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Plain RGB color, converted to backend colors at the rendering edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRAY: Rgb = Rgb(128, 128, 128);
    pub const STEELBLUE: Rgb = Rgb(70, 130, 180);
    pub const FIREBRICK: Rgb = Rgb(178, 34, 34);
    /// Goldenrod: readable on both dark terminals and white SVG backgrounds.
    pub const FALLBACK: Rgb = Rgb(218, 165, 32);

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// One parsed fare observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub price: f64,
    pub airline: Airline,
}

impl Record {
    /// Timestamp used by the time scale (midnight of `date`).
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }
}

/// All records of one airline, sorted by date ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    airline: Airline,
    records: Vec<Record>,
}

impl Series {
    /// Build a series; records are stably sorted by date so same-day rows keep
    /// their input order.
    pub fn new(airline: Airline, mut records: Vec<Record>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { airline, records }
    }

    pub fn airline(&self) -> &Airline {
        &self.airline
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Summary stats about the loaded records.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_records: usize,
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub price_min: f64,
    pub price_max: f64,
}

/// Grouped, read-only fare dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    series: Vec<Series>,
    stats: DatasetStats,
}

impl Dataset {
    /// Group records by airline, keeping airlines in order of first appearance.
    ///
    /// Returns `None` when there are no records.
    pub fn from_records(records: Vec<Record>) -> Option<Self> {
        let stats = compute_stats(&records)?;

        let mut groups: Vec<(Airline, Vec<Record>)> = Vec::new();
        for record in records {
            match groups.iter_mut().find(|(airline, _)| *airline == record.airline) {
                Some((_, bucket)) => bucket.push(record),
                None => groups.push((record.airline.clone(), vec![record])),
            }
        }

        let series = groups
            .into_iter()
            .map(|(airline, records)| Series::new(airline, records))
            .collect();

        Some(Self { series, stats })
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn stats(&self) -> &DatasetStats {
        &self.stats
    }
}

fn compute_stats(records: &[Record]) -> Option<DatasetStats> {
    let first = records.first()?;
    let mut stats = DatasetStats {
        n_records: records.len(),
        date_min: first.date,
        date_max: first.date,
        price_min: f64::INFINITY,
        price_max: f64::NEG_INFINITY,
    };

    for r in records {
        stats.date_min = stats.date_min.min(r.date);
        stats.date_max = stats.date_max.max(r.date);
        stats.price_min = stats.price_min.min(r.price);
        stats.price_max = stats.price_max.max(r.price);
    }

    if !stats.price_min.is_finite() || !stats.price_max.is_finite() {
        return None;
    }
    Some(stats)
}

/// A location in drawable-area pixels (origin at the top-left of the plot area).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: PixelPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Nearest-record answer for one query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResult {
    pub airline: Airline,
    pub record: Record,
    /// Euclidean distance in pixels between the query and `position`.
    pub distance: f64,
    /// Plotted position of `record`.
    pub position: PixelPoint,
}

/// Chart margins in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

/// Overall chart size and margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 500,
            margin: Margin {
                top: 70,
                right: 30,
                bottom: 60,
                left: 80,
            },
        }
    }
}

impl ChartLayout {
    /// Width of the drawable area.
    pub fn inner_width(&self) -> f64 {
        f64::from(self.width.saturating_sub(self.margin.left + self.margin.right))
    }

    /// Height of the drawable area.
    pub fn inner_height(&self) -> f64 {
        f64::from(self.height.saturating_sub(self.margin.top + self.margin.bottom))
    }

    /// Whether a point lies on the drawable (clickable) surface, edges included.
    pub fn contains(&self, p: PixelPoint) -> bool {
        (0.0..=self.inner_width()).contains(&p.x) && (0.0..=self.inner_height()).contains(&p.y)
    }

    /// Convert a drawable-area point to full-chart coordinates.
    pub fn to_outer(&self, p: PixelPoint) -> PixelPoint {
        PixelPoint::new(p.x + f64::from(self.margin.left), p.y + f64::from(self.margin.top))
    }
}

/// Where the fares come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Csv(PathBuf),
    /// Seeded synthetic fares for the three known airlines.
    Demo { seed: u64 },
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Csv(path) => write!(f, "{}", path.display()),
            DataSource::Demo { seed } => write!(f, "demo fares (seed {seed})"),
        }
    }
}

/// Resolved configuration shared by every front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub source: DataSource,
    /// Number of random reference points.
    pub point_count: usize,
    /// Seed for the reference points; `None` draws from OS entropy.
    pub point_seed: Option<u64>,
    pub layout: ChartLayout,
}

pub const DEFAULT_POINT_COUNT: usize = 10;
