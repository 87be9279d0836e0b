//! Chart geometry and interaction logic.
//!
//! - coordinate mapping (`scale`)
//! - axis ticks and titles (`axis`)
//! - nearest-point searches (`search`)
//! - reference-point cursor (`navigation`)

pub mod axis;
pub mod navigation;
pub mod scale;
pub mod search;

pub use navigation::{NavigationError, Navigator};
pub use scale::{ChartScales, PriceScale, TimeScale};
pub use search::{nearest_by_segment_endpoint, nearest_by_time};
