//! `fare-chart` library crate.
//!
//! The binary (`fares`) is a thin wrapper around this library so that:
//!
//! - search and navigation logic is testable without a terminal
//! - the TUI, the text reports and the SVG renderer share one session model

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
pub mod session;
pub mod tui;
