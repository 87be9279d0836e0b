//! Time (X) and price (Y) scales mapping data onto drawable-area pixels.
//!
//! Both scales are fixed once from the dataset extent; they never zoom or pan.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::{ChartLayout, Dataset, PixelPoint, Record};

const SECONDS_PER_DAY: i64 = 86_400;

/// Horizontal scale: `[date_min, date_max]` → `[0, width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    start: i64,
    end: i64,
    width: f64,
}

impl TimeScale {
    /// A single-date domain is widened to one day so the mapping stays invertible.
    pub fn new(date_min: NaiveDate, date_max: NaiveDate, width: f64) -> Self {
        let start = unix_seconds(date_min.and_time(NaiveTime::MIN));
        let mut end = unix_seconds(date_max.and_time(NaiveTime::MIN));
        if end <= start {
            end = start + SECONDS_PER_DAY;
        }
        Self { start, end, width }
    }

    #[inline]
    pub fn to_px(&self, t: NaiveDateTime) -> f64 {
        let span = (self.end - self.start) as f64;
        (unix_seconds(t) - self.start) as f64 / span * self.width
    }

    #[inline]
    pub fn date_to_px(&self, d: NaiveDate) -> f64 {
        self.to_px(d.and_time(NaiveTime::MIN))
    }

    /// Pixel → timestamp, rounded to the nearest second.
    ///
    /// Positions outside `[0, width]` extrapolate linearly; results beyond
    /// chrono's range saturate at `NaiveDateTime::MIN`/`MAX`.
    pub fn invert(&self, px: f64) -> NaiveDateTime {
        let span = (self.end - self.start) as f64;
        let secs = self.start as f64 + px / self.width * span;
        if !secs.is_finite() {
            return if px < 0.0 { NaiveDateTime::MIN } else { NaiveDateTime::MAX };
        }
        DateTime::from_timestamp(secs.round() as i64, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or(if secs < 0.0 { NaiveDateTime::MIN } else { NaiveDateTime::MAX })
    }
}

/// Vertical scale: `[0, price_max]` → `[height, 0]` (larger prices plot higher).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceScale {
    max: f64,
    height: f64,
}

impl PriceScale {
    pub fn new(price_max: f64, height: f64) -> Self {
        let max = if price_max.is_finite() && price_max > 0.0 { price_max } else { 1.0 };
        Self { max, height }
    }

    #[inline]
    pub fn to_px(&self, value: f64) -> f64 {
        self.height - value / self.max * self.height
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// The pair of scales for one chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartScales {
    pub time: TimeScale,
    pub price: PriceScale,
}

impl ChartScales {
    pub fn from_dataset(dataset: &Dataset, layout: &ChartLayout) -> Self {
        let stats = dataset.stats();
        Self {
            time: TimeScale::new(stats.date_min, stats.date_max, layout.inner_width()),
            price: PriceScale::new(stats.price_max, layout.inner_height()),
        }
    }

    /// Plotted position of a record.
    pub fn project(&self, record: &Record) -> PixelPoint {
        PixelPoint::new(self.time.to_px(record.timestamp()), self.price.to_px(record.price))
    }
}

fn unix_seconds(t: NaiveDateTime) -> i64 {
    t.and_utc().timestamp()
}
