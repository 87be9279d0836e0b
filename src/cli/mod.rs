//! Command-line parsing for the airline fare chart.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the chart/search code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_POINT_COUNT, PixelPoint};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fares", version, about = "Airline fare chart with nearest-point lookups")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI (default).
    ///
    /// Page through the reference points with `n`/`b` and click on the chart
    /// to look up the nearest fare.
    View(ChartArgs),
    /// Print the lookup for every reference point (and optionally a click).
    Query(QueryArgs),
    /// Print an ASCII rendering of the chart.
    Plot(PlotArgs),
    /// Write the chart to an SVG file.
    Render(RenderArgs),
}

/// Options shared by every command: where the data comes from and how the
/// reference points are drawn.
#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Fare CSV with `date` (MM/DD/YY), `price` and `airline` columns.
    ///
    /// Falls back to `FARES_CSV`, then to generated demo fares.
    #[arg(long, value_name = "CSV")]
    pub csv: Option<PathBuf>,

    /// Number of random reference points.
    #[arg(short = 'n', long, default_value_t = DEFAULT_POINT_COUNT)]
    pub points: usize,

    /// Seed for the reference points (random when omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Seed for the generated demo fares.
    #[arg(long, default_value_t = 42)]
    pub demo_seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct QueryArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Also look up a click at drawable-area pixels `X,Y`.
    #[arg(long, value_name = "X,Y", value_parser = parse_click)]
    pub click: Option<PixelPoint>,

    /// Print JSON lines instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Export per-point lookups to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub chart: ChartArgs,

    /// Output SVG path.
    #[arg(long, value_name = "SVG")]
    pub out: PathBuf,

    /// Click at drawable-area pixels `X,Y` before rendering.
    #[arg(long, value_name = "X,Y", value_parser = parse_click)]
    pub click: Option<PixelPoint>,

    /// Advance the highlighted reference point this many times.
    #[arg(long, default_value_t = 0)]
    pub advance: usize,
}

/// Parse `X,Y` into a pixel point.
pub fn parse_click(s: &str) -> Result<PixelPoint, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{s}'"))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("invalid x coordinate '{}'", x.trim()))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("invalid y coordinate '{}'", y.trim()))?;
    if !(x.is_finite() && y.is_finite()) {
        return Err(format!("coordinates must be finite: '{s}'"));
    }
    Ok(PixelPoint::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_click_accepts_spaces() {
        assert_eq!(parse_click("120, 45.5").unwrap(), PixelPoint::new(120.0, 45.5));
    }

    #[test]
    fn parse_click_rejects_garbage() {
        assert!(parse_click("120").is_err());
        assert!(parse_click("a,1").is_err());
        assert!(parse_click("1,NaN").is_err());
    }

    #[test]
    fn query_flags_parse() {
        let cli = Cli::try_parse_from(["fares", "query", "--csv", "f.csv", "--click", "10,20", "--json", "--seed", "3"])
            .unwrap();
        let Command::Query(args) = cli.command else {
            panic!("expected query");
        };
        assert_eq!(args.chart.csv, Some(PathBuf::from("f.csv")));
        assert_eq!(args.chart.seed, Some(3));
        assert_eq!(args.chart.points, DEFAULT_POINT_COUNT);
        assert_eq!(args.click, Some(PixelPoint::new(10.0, 20.0)));
        assert!(args.json);
    }
}
