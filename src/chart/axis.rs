//! Axis tick generation.

use chrono::{Datelike, Months, NaiveDate};

pub const X_AXIS_TITLE: &str = "Date (Month/Day/Year)";
pub const Y_AXIS_TITLE: &str = "Price ($)";

/// First day of every month inside `[start, end]`.
pub fn month_ticks(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut ticks = Vec::new();
    let Some(mut d) = start.with_day(1) else {
        return ticks;
    };
    if d < start {
        match d.checked_add_months(Months::new(1)) {
            Some(next) => d = next,
            None => return ticks,
        }
    }
    while d <= end {
        ticks.push(d);
        match d.checked_add_months(Months::new(1)) {
            Some(next) => d = next,
            None => break,
        }
    }
    ticks
}

/// Month tick label, e.g. `Mar 2024`.
pub fn fmt_month(d: NaiveDate) -> String {
    d.format("%b %Y").to_string()
}

/// "Nice" ticks over `[0, max]` with roughly `count` steps of 1, 2 or 5 × 10^k.
pub fn price_ticks(max: f64, count: usize) -> Vec<f64> {
    if !max.is_finite() || max <= 0.0 || count == 0 {
        return vec![0.0];
    }
    let step = nice_step(max / count as f64);
    let n = (max / step + 1e-9).floor() as usize;
    (0..=n).map(|i| i as f64 * step).collect()
}

fn nice_step(raw: f64) -> f64 {
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Price tick label without trailing zeros.
pub fn fmt_price_tick(v: f64) -> String {
    if (v - v.round()).abs() < 1e-9 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_ticks_skip_partial_first_month() {
        let ticks = month_ticks(date(2023, 11, 15), date(2024, 2, 1));
        assert_eq!(ticks, vec![date(2023, 12, 1), date(2024, 1, 1), date(2024, 2, 1)]);
        assert_eq!(fmt_month(ticks[1]), "Jan 2024");
    }

    #[test]
    fn month_ticks_include_start_on_first() {
        let ticks = month_ticks(date(2024, 3, 1), date(2024, 3, 20));
        assert_eq!(ticks, vec![date(2024, 3, 1)]);
    }

    #[test]
    fn price_ticks_are_nice() {
        assert_eq!(
            price_ticks(500.0, 10),
            vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0]
        );
        assert_eq!(price_ticks(37.0, 10), vec![0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0]);
        assert_eq!(price_ticks(0.0, 10), vec![0.0]);
    }

    #[test]
    fn price_tick_labels() {
        assert_eq!(fmt_price_tick(150.0), "150");
        assert_eq!(fmt_price_tick(0.5), "0.5");
    }
}
