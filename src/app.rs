//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - sets up logging
//! - loads fares and builds the session
//! - prints reports/plots or hands over to the TUI
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::cli::{ChartArgs, Command, PlotArgs, QueryArgs, RenderArgs};
use crate::domain::{ChartConfig, ChartLayout, DataSource, LookupResult, PixelPoint};
use crate::error::AppError;
use crate::session::{Event, Session};

pub mod pipeline;

/// Environment variable holding a default fare CSV path.
pub const FARES_CSV_ENV: &str = "FARES_CSV";

/// Entry point for the `fares` binary.
pub fn run() -> Result<(), AppError> {
    // We want `fares` and `fares --csv x.csv` to behave like `fares view ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    match cli.command {
        Command::View(args) => handle_view(args),
        Command::Query(args) => handle_query(args),
        Command::Plot(args) => handle_plot(args),
        Command::Render(args) => handle_render(args),
    }
}

fn handle_view(args: ChartArgs) -> Result<(), AppError> {
    // The terminal belongs to the UI, so logs go to a file.
    init_file_logging()?;
    let config = config_from_args(&args, std::env::var(FARES_CSV_ENV).ok());
    info!(source = %config.source, points = config.point_count, "starting fare chart");
    crate::tui::run(config)
}

fn handle_query(args: QueryArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let config = config_from_args(&args.chart, std::env::var(FARES_CSV_ENV).ok());
    let mut chart = pipeline::load_chart(&config)?;
    chart.session.start();

    let reports = crate::report::point_reports(&chart.session);
    let click = args
        .click
        .map(|p| query_click(&chart.session, p).map(|result| (p, result)))
        .transpose()?;

    if args.json {
        for report in &reports {
            println!("{}", to_json(report)?);
        }
        if let Some((query, result)) = &click {
            let line = serde_json::json!({ "click": query, "result": result });
            println!("{line}");
        }
    } else {
        println!(
            "{}",
            crate::report::format_dataset_summary(&config.source, chart.session.dataset(), &chart.row_errors)
        );
        println!("{}", crate::report::format_point_reports(&reports, chart.session.cursor()));
        if let Some((query, result)) = &click {
            println!("{}", crate::report::format_click_report(*query, result.as_ref()));
        }
    }

    if let Some(path) = &args.export {
        crate::io::export::write_lookups_csv(path, &reports)?;
        info!(path = %path.display(), rows = reports.len(), "exported lookups");
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let config = config_from_args(&args.chart, std::env::var(FARES_CSV_ENV).ok());
    let mut chart = pipeline::load_chart(&config)?;
    chart.session.start();

    let plot = crate::plot::render_ascii_chart(&chart.session, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    init_stderr_logging();
    let config = config_from_args(&args.chart, std::env::var(FARES_CSV_ENV).ok());
    let mut chart = pipeline::load_chart(&config)?;
    chart.session.start();

    for _ in 0..args.advance {
        chart.session.dispatch(Event::Advance);
    }
    if let Some(p) = args.click {
        if chart.session.dispatch(Event::Click { x: p.x, y: p.y }).is_empty() {
            return Err(outside_drawable_area(p));
        }
    }

    crate::plot::render_svg(&args.out, &chart.session)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}

/// Click lookup for `query --click`; off-surface clicks are rejected the same
/// way `render --click` rejects them.
fn query_click(session: &Session, click: PixelPoint) -> Result<Option<LookupResult>, AppError> {
    if !session.layout().contains(click) {
        return Err(outside_drawable_area(click));
    }
    Ok(session.lookup_click(click))
}

fn outside_drawable_area(p: PixelPoint) -> AppError {
    AppError::new(2, format!("Click ({}, {}) is outside the drawable area.", p.x, p.y))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))
}

/// Build the resolved configuration.
///
/// Source precedence: `--csv`, then `env_csv` (from `FARES_CSV`), then demo fares.
pub fn config_from_args(args: &ChartArgs, env_csv: Option<String>) -> ChartConfig {
    let source = match (&args.csv, env_csv.filter(|s| !s.trim().is_empty())) {
        (Some(path), _) => DataSource::Csv(path.clone()),
        (None, Some(path)) => DataSource::Csv(PathBuf::from(path.trim())),
        (None, None) => DataSource::Demo { seed: args.demo_seed },
    };
    ChartConfig {
        source,
        point_count: args.points,
        point_seed: args.seed,
        layout: ChartLayout::default(),
    }
}

/// Log to a daily-rotated file under `./logs`.
fn init_file_logging() -> Result<(), AppError> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = PathBuf::from("./logs");
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| AppError::new(4, format!("Failed to create log dir '{}': {e}", log_dir.display())))?;
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "fares.log");

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fare_chart=debug,info")))
        .try_init();
    Ok(())
}

fn init_stderr_logging() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fare_chart=info")))
        .try_init();
}

/// Rewrite argv so `fares` defaults to `fares view`.
///
/// Rules:
/// - `fares`                      -> `fares view`
/// - `fares --csv f.csv ...`      -> `fares view --csv f.csv ...`
/// - `fares --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("view".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "view" | "query" | "plot" | "render");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "view flags".
    if arg1.starts_with('-') {
        argv.insert(1, "view".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    fn chart_args(csv: Option<&str>) -> ChartArgs {
        ChartArgs {
            csv: csv.map(PathBuf::from),
            points: 4,
            seed: Some(9),
            demo_seed: 42,
        }
    }

    #[test]
    fn bare_invocation_runs_view() {
        assert_eq!(rewrite_args(argv(&["fares"])), argv(&["fares", "view"]));
    }

    #[test]
    fn leading_flag_runs_view() {
        assert_eq!(
            rewrite_args(argv(&["fares", "--csv", "f.csv"])),
            argv(&["fares", "view", "--csv", "f.csv"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for a in [
            argv(&["fares", "query", "--json"]),
            argv(&["fares", "--help"]),
            argv(&["fares", "-V"]),
            argv(&["fares", "render", "--out", "x.svg"]),
        ] {
            assert_eq!(rewrite_args(a.clone()), a);
        }
    }

    #[test]
    fn csv_flag_beats_env() {
        let config = config_from_args(&chart_args(Some("a.csv")), Some("b.csv".to_string()));
        assert_eq!(config.source, DataSource::Csv(PathBuf::from("a.csv")));
        assert_eq!(config.point_count, 4);
        assert_eq!(config.point_seed, Some(9));
    }

    #[test]
    fn env_csv_used_when_flag_missing() {
        let config = config_from_args(&chart_args(None), Some(" b.csv ".to_string()));
        assert_eq!(config.source, DataSource::Csv(PathBuf::from("b.csv")));
    }

    fn demo_session() -> Session {
        let config = config_from_args(&chart_args(None), None);
        let mut chart = pipeline::load_chart(&config).unwrap();
        chart.session.start();
        chart.session
    }

    #[test]
    fn query_click_rejects_off_surface_clicks() {
        let session = demo_session();
        let err = query_click(&session, PixelPoint::new(-500.0, 9999.0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("outside the drawable area"));

        let err = query_click(&session, PixelPoint::new(10.0, 371.0)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn query_click_matches_session_lookup_inside_surface() {
        let session = demo_session();
        let click = PixelPoint::new(400.0, 200.0);
        let result = query_click(&session, click).unwrap();
        assert!(result.is_some());
        assert_eq!(result, session.lookup_click(click));
    }

    #[test]
    fn demo_when_nothing_configured() {
        let config = config_from_args(&chart_args(None), Some("  ".to_string()));
        assert_eq!(config.source, DataSource::Demo { seed: 42 });
        assert_eq!(config.layout, ChartLayout::default());
    }
}
