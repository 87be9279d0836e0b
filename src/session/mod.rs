//! Interaction session: reference-point navigation and click lookups.
//!
//! All interaction state lives in [`Session`]. Front-ends translate their input
//! into an [`Event`], call [`Session::dispatch`], and apply the returned
//! [`Effect`]s to whatever they draw on. The session also keeps the latest
//! marker/tooltip state so a renderer can redraw from scratch at any time.

use tracing::debug;

use crate::chart::{ChartScales, NavigationError, Navigator, nearest_by_segment_endpoint, nearest_by_time};
use crate::domain::{ChartLayout, Dataset, LookupResult, PixelPoint};
use crate::report::format::{click_tooltip_lines, point_tooltip_lines};

/// Tooltip offset from a reference point (right, up).
const POINT_TOOLTIP_OFFSET: (f64, f64) = (20.0, -10.0);
/// Tooltip offset from a click (right, up).
const CLICK_TOOLTIP_OFFSET: (f64, f64) = (20.0, -40.0);

/// User input understood by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Move to the next reference point.
    Advance,
    /// Move to the previous reference point.
    Retreat,
    /// Click in drawable-area pixels.
    Click { x: f64, y: f64 },
}

/// Floating annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    /// Top-left corner in full-chart coordinates (margins included).
    pub anchor: PixelPoint,
    pub lines: Vec<String>,
}

/// Rendering instruction produced by [`Session::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    HighlightPoint(usize),
    ShowTooltip(Tooltip),
    MoveClickMarker(PixelPoint),
    MoveDataMarker(PixelPoint),
    HideDataMarker,
}

#[derive(Debug, Clone)]
pub struct Session {
    dataset: Dataset,
    layout: ChartLayout,
    scales: ChartScales,
    points: Vec<PixelPoint>,
    nav: Navigator,
    click_marker: Option<PixelPoint>,
    data_marker: Option<PixelPoint>,
    tooltip: Option<Tooltip>,
}

impl Session {
    pub fn new(dataset: Dataset, layout: ChartLayout, points: Vec<PixelPoint>) -> Result<Self, NavigationError> {
        let nav = Navigator::new(points.len())?;
        let scales = ChartScales::from_dataset(&dataset, &layout);
        Ok(Self {
            dataset,
            layout,
            scales,
            points,
            nav,
            click_marker: None,
            data_marker: None,
            tooltip: None,
        })
    }

    /// Highlight the initial reference point (cursor 0).
    pub fn start(&mut self) -> Vec<Effect> {
        self.show_current_point()
    }

    pub fn dispatch(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::Advance => {
                self.nav.advance();
                self.show_current_point()
            }
            Event::Retreat => {
                self.nav.retreat();
                self.show_current_point()
            }
            Event::Click { x, y } => self.click(PixelPoint::new(x, y)),
        }
    }

    /// Endpoint lookup for reference point `index`.
    pub fn lookup_point(&self, index: usize) -> Option<LookupResult> {
        let point = *self.points.get(index)?;
        nearest_by_segment_endpoint(self.dataset.series(), &self.scales, point)
    }

    /// Time-bisection lookup for a click.
    pub fn lookup_click(&self, click: PixelPoint) -> Option<LookupResult> {
        nearest_by_time(self.dataset.series(), &self.scales, click)
    }

    fn show_current_point(&mut self) -> Vec<Effect> {
        let index = self.nav.cursor();
        let point = self.points[index];
        let result = self.lookup_point(index);
        debug!(
            index,
            x = point.x,
            y = point.y,
            airline = result.as_ref().map(|r| r.airline.code()),
            distance = result.as_ref().map(|r| r.distance),
            "reference point lookup"
        );

        let outer = self.layout.to_outer(point);
        let tooltip = Tooltip {
            anchor: PixelPoint::new(outer.x + POINT_TOOLTIP_OFFSET.0, outer.y + POINT_TOOLTIP_OFFSET.1),
            lines: point_tooltip_lines(index, result.as_ref()),
        };
        self.tooltip = Some(tooltip.clone());

        vec![Effect::HighlightPoint(index), Effect::ShowTooltip(tooltip)]
    }

    fn click(&mut self, click: PixelPoint) -> Vec<Effect> {
        if !self.layout.contains(click) {
            return Vec::new();
        }

        let result = self.lookup_click(click);
        debug!(
            x = click.x,
            y = click.y,
            airline = result.as_ref().map(|r| r.airline.code()),
            distance = result.as_ref().map(|r| r.distance),
            "click lookup"
        );

        self.click_marker = Some(click);
        let mut effects = vec![Effect::MoveClickMarker(click)];

        match result {
            Some(result) => {
                self.data_marker = Some(result.position);
                let outer = self.layout.to_outer(click);
                let tooltip = Tooltip {
                    anchor: PixelPoint::new(outer.x + CLICK_TOOLTIP_OFFSET.0, outer.y + CLICK_TOOLTIP_OFFSET.1),
                    lines: click_tooltip_lines(&result),
                };
                self.tooltip = Some(tooltip.clone());
                effects.push(Effect::MoveDataMarker(result.position));
                effects.push(Effect::ShowTooltip(tooltip));
            }
            None => {
                self.data_marker = None;
                effects.push(Effect::HideDataMarker);
            }
        }

        effects
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn scales(&self) -> &ChartScales {
        &self.scales
    }

    pub fn points(&self) -> &[PixelPoint] {
        &self.points
    }

    pub fn cursor(&self) -> usize {
        self.nav.cursor()
    }

    pub fn click_marker(&self) -> Option<PixelPoint> {
        self.click_marker
    }

    pub fn data_marker(&self) -> Option<PixelPoint> {
        self.data_marker
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{Airline, Record};

    fn rec(day: u32, price: f64, airline: Airline) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            price,
            airline,
        }
    }

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            rec(1, 10.0, Airline::Aal),
            rec(5, 20.0, Airline::Aal),
            rec(10, 30.0, Airline::Aal),
        ])
        .unwrap()
    }

    fn session(n: usize) -> Session {
        let points = (0..n).map(|i| PixelPoint::new(i as f64 * 100.0, 50.0)).collect();
        Session::new(dataset(), ChartLayout::default(), points).unwrap()
    }

    #[test]
    fn rejects_empty_reference_points() {
        assert!(Session::new(dataset(), ChartLayout::default(), Vec::new()).is_err());
    }

    #[test]
    fn start_highlights_first_point() {
        let mut s = session(3);
        let effects = s.start();
        assert_eq!(effects[0], Effect::HighlightPoint(0));
        let Effect::ShowTooltip(tooltip) = &effects[1] else {
            panic!("expected tooltip, got {effects:?}");
        };
        assert_eq!(tooltip.anchor, PixelPoint::new(0.0 + 80.0 + 20.0, 50.0 + 70.0 - 10.0));
        assert_eq!(tooltip.lines[0], "Point Index: 1");
        assert_eq!(tooltip.lines[1], "Nearest Airline: AAL");
        assert_eq!(s.tooltip(), Some(tooltip));
    }

    #[test]
    fn navigation_wraps_and_highlights() {
        let mut s = session(3);
        s.start();
        assert_eq!(s.dispatch(Event::Retreat)[0], Effect::HighlightPoint(2));
        assert_eq!(s.dispatch(Event::Advance)[0], Effect::HighlightPoint(0));
        assert_eq!(s.dispatch(Event::Advance)[0], Effect::HighlightPoint(1));
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn click_moves_both_markers() {
        let mut s = session(1);
        let day4 = s.scales().time.date_to_px(NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        let effects = s.dispatch(Event::Click { x: day4, y: 100.0 });

        let expected = s.scales().project(&rec(5, 20.0, Airline::Aal));
        assert_eq!(effects[0], Effect::MoveClickMarker(PixelPoint::new(day4, 100.0)));
        assert_eq!(effects[1], Effect::MoveDataMarker(expected));
        let Effect::ShowTooltip(tooltip) = &effects[2] else {
            panic!("expected tooltip, got {effects:?}");
        };
        assert_eq!(tooltip.lines, vec!["Date: 1/5/2024", "Price: 20.00", "Airline: AAL"]);
        assert_eq!(s.click_marker(), Some(PixelPoint::new(day4, 100.0)));
        assert_eq!(s.data_marker(), Some(expected));
        // Clicking leaves the cursor alone.
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn click_outside_surface_is_ignored() {
        let mut s = session(1);
        assert!(s.dispatch(Event::Click { x: -1.0, y: 10.0 }).is_empty());
        assert!(s.dispatch(Event::Click { x: 10.0, y: 371.0 }).is_empty());
        assert_eq!(s.click_marker(), None);
    }

    #[test]
    fn click_without_segments_hides_data_marker() {
        let ds = Dataset::from_records(vec![rec(1, 10.0, Airline::Aal)]).unwrap();
        let mut s = Session::new(ds, ChartLayout::default(), vec![PixelPoint::new(1.0, 1.0)]).unwrap();

        let effects = s.start();
        let Effect::ShowTooltip(tooltip) = &effects[1] else {
            panic!("expected tooltip, got {effects:?}");
        };
        assert_eq!(tooltip.lines, vec!["Point Index: 1", "No nearby data"]);

        let effects = s.dispatch(Event::Click { x: 5.0, y: 5.0 });
        assert_eq!(effects, vec![Effect::MoveClickMarker(PixelPoint::new(5.0, 5.0)), Effect::HideDataMarker]);
        assert_eq!(s.data_marker(), None);
    }
}
