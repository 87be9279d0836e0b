//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - airline categories and their display colors (`Airline`, `Rgb`)
//! - parsed fare records grouped into per-airline series (`Record`, `Series`, `Dataset`)
//! - chart geometry and lookup outputs (`ChartLayout`, `PixelPoint`, `LookupResult`)

pub mod types;

pub use types::*;
