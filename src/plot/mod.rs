//! Non-interactive chart renderers.
//!
//! - fixed-size character grid (`ascii`)
//! - full-size SVG document (`svg`)

pub mod ascii;
pub mod svg;

pub use ascii::render_ascii_chart;
pub use svg::render_svg;
