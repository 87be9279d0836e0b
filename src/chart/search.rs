//! Nearest-point searches used by the tooltips.
//!
//! Both searches scan every series (no early exit across airlines) and keep the
//! first strict minimum in series-then-index order, so ties resolve to the
//! earliest candidate. Series with fewer than two records cannot form a segment
//! and contribute nothing; when no series contributes the answer is `None`.

use chrono::NaiveDateTime;

use crate::chart::scale::ChartScales;
use crate::domain::{LookupResult, PixelPoint, Record, Series};

/// Nearest segment *end point* to `query`.
///
/// For each pair `(S[i-1], S[i])` only `S[i]` is measured. This is an
/// endpoint-distance approximation, not the geometric point-to-segment
/// distance, so the first record of a series is never returned.
pub fn nearest_by_segment_endpoint(
    series: &[Series],
    scales: &ChartScales,
    query: PixelPoint,
) -> Option<LookupResult> {
    let mut best: Option<LookupResult> = None;

    for s in series {
        let records = s.records();
        for end in records.iter().skip(1) {
            let position = scales.project(end);
            let distance = query.distance_to(position);
            if best.as_ref().is_none_or(|b| distance < b.distance) {
                best = Some(LookupResult {
                    airline: s.airline().clone(),
                    record: end.clone(),
                    distance,
                    position,
                });
            }
        }
    }

    best
}

/// Nearest record to a click, chosen per series by time and across series by
/// pixel distance.
///
/// The click's x position is inverted to a timestamp; each series is bisected
/// for it, the temporally closer of the two bracketing records is kept (the
/// earlier one on a tie), and the series whose pick lies closest to the click
/// in pixels wins. Timestamps outside the data range clamp to the first or last
/// segment.
pub fn nearest_by_time(
    series: &[Series],
    scales: &ChartScales,
    click: PixelPoint,
) -> Option<LookupResult> {
    let target = scales.time.invert(click.x);
    let mut best: Option<LookupResult> = None;

    for s in series {
        let Some(record) = closest_in_time(s.records(), target) else {
            continue;
        };
        let position = scales.project(record);
        let distance = click.distance_to(position);
        if best.as_ref().is_none_or(|b| distance < b.distance) {
            best = Some(LookupResult {
                airline: s.airline().clone(),
                record: record.clone(),
                distance,
                position,
            });
        }
    }

    best
}

/// Temporally closest record among the two bracketing `target`.
pub fn closest_in_time(records: &[Record], target: NaiveDateTime) -> Option<&Record> {
    if records.len() < 2 {
        return None;
    }
    let i = bisect_left(records, target, 1).clamp(1, records.len() - 1);
    let d0 = &records[i - 1];
    let d1 = &records[i];
    if target - d0.timestamp() > d1.timestamp() - target {
        Some(d1)
    } else {
        Some(d0)
    }
}

/// First index `>= lo` whose timestamp is not before `target`.
///
/// An exact match at `records[i]` (with `i >= lo`) returns `i`; a target past
/// the end returns `records.len()`.
pub fn bisect_left(records: &[Record], target: NaiveDateTime, lo: usize) -> usize {
    if lo >= records.len() {
        return records.len();
    }
    lo + records[lo..].partition_point(|r| r.timestamp() < target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    use crate::domain::{Airline, ChartLayout, Dataset};

    fn rec(day: u32, price: f64, airline: Airline) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
            airline,
        }
    }

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap().and_time(NaiveTime::MIN)
    }

    fn setup(records: Vec<Record>) -> (Dataset, ChartScales) {
        let ds = Dataset::from_records(records).unwrap();
        let scales = ChartScales::from_dataset(&ds, &ChartLayout::default());
        (ds, scales)
    }

    fn three_airlines() -> Vec<Record> {
        vec![
            rec(1, 100.0, Airline::Aal),
            rec(5, 120.0, Airline::Aal),
            rec(10, 110.0, Airline::Aal),
            rec(1, 200.0, Airline::Ual),
            rec(5, 210.0, Airline::Ual),
            rec(10, 190.0, Airline::Ual),
            rec(1, 300.0, Airline::Dal),
            rec(5, 280.0, Airline::Dal),
            rec(10, 320.0, Airline::Dal),
        ]
    }

    #[test]
    fn bisect_left_exact_matches_return_their_index() {
        let (ds, _) = setup(vec![
            rec(1, 10.0, Airline::Aal),
            rec(5, 20.0, Airline::Aal),
            rec(10, 30.0, Airline::Aal),
        ]);
        let records = ds.series()[0].records();

        assert_eq!(bisect_left(records, at(5), 1), 1);
        assert_eq!(bisect_left(records, at(10), 1), 2);
        // lo = 1 means day 1 still lands on index 1.
        assert_eq!(bisect_left(records, at(1), 1), 1);
        assert_eq!(bisect_left(records, at(1), 0), 0);
        assert_eq!(bisect_left(records, at(4), 1), 1);
        assert_eq!(bisect_left(records, at(20), 1), 3);
        assert_eq!(bisect_left(records, at(20), 7), 3);
    }

    #[test]
    fn closest_in_time_picks_exact_record() {
        let (ds, _) = setup(vec![
            rec(1, 10.0, Airline::Aal),
            rec(5, 20.0, Airline::Aal),
            rec(10, 30.0, Airline::Aal),
        ]);
        let records = ds.series()[0].records();
        for r in records {
            assert_eq!(closest_in_time(records, r.timestamp()), Some(r));
        }
    }

    #[test]
    fn closest_in_time_tie_keeps_earlier_record() {
        let (ds, _) = setup(vec![rec(1, 10.0, Airline::Aal), rec(3, 20.0, Airline::Aal)]);
        let records = ds.series()[0].records();
        assert_eq!(closest_in_time(records, at(2)).unwrap().price, 10.0);
    }

    #[test]
    fn closest_in_time_clamps_outside_domain() {
        let (ds, _) = setup(vec![
            rec(5, 10.0, Airline::Aal),
            rec(6, 20.0, Airline::Aal),
            rec(7, 30.0, Airline::Aal),
        ]);
        let records = ds.series()[0].records();
        assert_eq!(closest_in_time(records, at(1)).unwrap().price, 10.0);
        assert_eq!(closest_in_time(records, at(31)).unwrap().price, 30.0);
        assert_eq!(closest_in_time(records, NaiveDateTime::MIN).unwrap().price, 10.0);
        assert_eq!(closest_in_time(records, NaiveDateTime::MAX).unwrap().price, 30.0);
    }

    #[test]
    fn click_at_day_four_resolves_to_day_five() {
        let (ds, scales) = setup(vec![
            rec(1, 10.0, Airline::Aal),
            rec(5, 20.0, Airline::Aal),
            rec(10, 30.0, Airline::Aal),
        ]);
        let click = PixelPoint::new(scales.time.to_px(at(4)), 100.0);

        let result = nearest_by_time(ds.series(), &scales, click).unwrap();
        assert_eq!(result.airline, Airline::Aal);
        assert_eq!(result.record.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());

        let expected = scales.project(&result.record);
        assert_eq!(result.position, expected);
        assert!((result.distance - click.distance_to(expected)).abs() < 1e-9);
    }

    #[test]
    fn click_outside_domain_still_resolves() {
        let (ds, scales) = setup(three_airlines());
        let left = nearest_by_time(ds.series(), &scales, PixelPoint::new(-500.0, 0.0)).unwrap();
        assert_eq!(left.record.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let right = nearest_by_time(ds.series(), &scales, PixelPoint::new(5000.0, 370.0)).unwrap();
        assert_eq!(right.record.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        // Bottom of the chart is closest to the cheapest airline.
        assert_eq!(right.airline, Airline::Aal);
    }

    #[test]
    fn click_considers_every_airline() {
        let (ds, scales) = setup(three_airlines());
        let dal_day5 = scales.project(&rec(5, 280.0, Airline::Dal));
        let result = nearest_by_time(ds.series(), &scales, dal_day5).unwrap();
        assert_eq!(result.airline, Airline::Dal);
        assert!(result.distance < 1e-9);
    }

    #[test]
    fn endpoint_search_exact_hit_has_zero_distance() {
        let (ds, scales) = setup(three_airlines());
        let target = rec(5, 210.0, Airline::Ual);
        let query = scales.project(&target);

        let result = nearest_by_segment_endpoint(ds.series(), &scales, query).unwrap();
        assert_eq!(result.airline, Airline::Ual);
        assert_eq!(result.record, target);
        assert!(result.distance < 1e-9);

        // Every other airline's best endpoint is strictly farther away.
        for s in ds.series().iter().filter(|s| *s.airline() != Airline::Ual) {
            let other = nearest_by_segment_endpoint(std::slice::from_ref(s), &scales, query).unwrap();
            assert!(other.distance > result.distance);
        }
    }

    #[test]
    fn endpoint_search_ignores_segment_start_points() {
        // Query sits exactly on the first record, which is never a segment end.
        let (ds, scales) = setup(vec![rec(1, 10.0, Airline::Aal), rec(10, 30.0, Airline::Aal)]);
        let query = scales.project(&ds.series()[0].records()[0]);

        let result = nearest_by_segment_endpoint(ds.series(), &scales, query).unwrap();
        assert_eq!(result.record.price, 30.0);
        assert!(result.distance > 0.0);
    }

    #[test]
    fn endpoint_distance_is_attained_by_a_real_record() {
        let (ds, scales) = setup(three_airlines());
        let queries = [
            PixelPoint::new(0.0, 0.0),
            PixelPoint::new(545.0, 185.0),
            PixelPoint::new(1090.0, 370.0),
            PixelPoint::new(300.0, 50.0),
        ];
        for q in queries {
            let result = nearest_by_segment_endpoint(ds.series(), &scales, q).unwrap();
            assert!(result.distance >= 0.0);
            let attained = ds
                .series()
                .iter()
                .flat_map(|s| s.records().iter().skip(1))
                .any(|r| (q.distance_to(scales.project(r)) - result.distance).abs() < 1e-9);
            assert!(attained);
        }
    }

    #[test]
    fn endpoint_search_tie_keeps_first_series() {
        // Two airlines with identical records: the first encountered wins.
        let (ds, scales) = setup(vec![
            rec(1, 10.0, Airline::Aal),
            rec(2, 20.0, Airline::Aal),
            rec(1, 10.0, Airline::Ual),
            rec(2, 20.0, Airline::Ual),
        ]);
        let result = nearest_by_segment_endpoint(ds.series(), &scales, PixelPoint::new(0.0, 0.0)).unwrap();
        assert_eq!(result.airline, Airline::Aal);
    }

    #[test]
    fn short_series_yield_no_result() {
        let (ds, scales) = setup(vec![rec(1, 10.0, Airline::Aal), rec(2, 20.0, Airline::Ual)]);
        let q = PixelPoint::new(10.0, 10.0);
        assert!(nearest_by_segment_endpoint(ds.series(), &scales, q).is_none());
        assert!(nearest_by_time(ds.series(), &scales, q).is_none());
        assert!(nearest_by_segment_endpoint(&[], &scales, q).is_none());
    }
}
