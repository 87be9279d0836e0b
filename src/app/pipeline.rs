//! Shared "load pipeline" used by every front-end.
//!
//! data source -> ingest (or demo generation) -> reference points -> session
//!
//! The CLI, the SVG renderer and the TUI can then focus on presentation.

use tracing::info;

use crate::data::{generate_demo_fares, generate_reference_points, reference_rng};
use crate::domain::{ChartConfig, DataSource, Dataset};
use crate::error::AppError;
use crate::io::ingest::{IngestedFares, RowError, load_fares};
use crate::session::Session;

/// Everything a front-end needs to show one chart.
#[derive(Debug, Clone)]
pub struct LoadedChart {
    pub session: Session,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load the configured data source.
pub fn load_dataset(source: &DataSource) -> Result<IngestedFares, AppError> {
    match source {
        DataSource::Csv(path) => Ok(load_fares(path)?),
        DataSource::Demo { seed } => {
            let records = generate_demo_fares(*seed)?;
            let rows = records.len();
            let dataset = Dataset::from_records(records)
                .ok_or_else(|| AppError::new(3, "Demo fare generation produced no rows."))?;
            info!(seed, rows, "generated demo fares");
            Ok(IngestedFares {
                dataset,
                row_errors: Vec::new(),
                rows_read: rows,
                rows_used: rows,
            })
        }
    }
}

/// Load the data and build a session with fresh reference points.
///
/// The session has not been started; front-ends call [`Session::start`] to
/// get the initial highlight.
pub fn load_chart(config: &ChartConfig) -> Result<LoadedChart, AppError> {
    let ingested = load_dataset(&config.source)?;

    let mut rng = reference_rng(config.point_seed);
    let points = generate_reference_points(config.point_count, &config.layout, &mut rng);
    let session = Session::new(ingested.dataset, config.layout, points)?;

    Ok(LoadedChart {
        session,
        row_errors: ingested.row_errors,
        rows_read: ingested.rows_read,
        rows_used: ingested.rows_used,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChartLayout;

    fn demo_config(point_count: usize) -> ChartConfig {
        ChartConfig {
            source: DataSource::Demo { seed: 42 },
            point_count,
            point_seed: Some(7),
            layout: ChartLayout::default(),
        }
    }

    #[test]
    fn demo_chart_loads_all_airlines() {
        let chart = load_chart(&demo_config(10)).unwrap();
        assert_eq!(chart.session.points().len(), 10);
        assert_eq!(chart.session.dataset().series().len(), 3);
        assert!(chart.row_errors.is_empty());
        assert_eq!(chart.rows_read, chart.rows_used);
    }

    #[test]
    fn seeded_points_are_reproducible() {
        let a = load_chart(&demo_config(5)).unwrap();
        let b = load_chart(&demo_config(5)).unwrap();
        assert_eq!(a.session.points(), b.session.points());
    }

    #[test]
    fn zero_points_is_a_config_error() {
        let err = load_chart(&demo_config(0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn missing_csv_is_an_input_error() {
        let config = ChartConfig {
            source: DataSource::Csv("/definitely/not/here/fares.csv".into()),
            ..demo_config(3)
        };
        let err = load_chart(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
